//! File open flags in the familiar `fopen`/`fs.open` string form.
//!
//! | flags  | mode                 | target          |
//! |--------|----------------------|-----------------|
//! | `wx`   | exclusive create     | destination     |
//! | `w`    | write + truncate     | `<dest>.part`   |
//! | `a`    | append               | destination     |
//! | `ax`   | append (must not exist) | destination  |
//!
//! `+` (read access) and `s` (synchronous) are accepted and ignored.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Suffix of the staging file used for [`WriteMode::WriteTruncate`]
pub const STAGING_SUFFIX: &str = ".part";

/// How a destination file is written
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    /// Create a new file, failing if it already exists
    ExclusiveCreate,
    /// Create or truncate, staged through a `.part` file and renamed on success
    WriteTruncate,
    /// Append to the file, creating it if missing
    Append,
}

/// Parsed open flags
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteFlags {
    append: bool,
    exclusive: bool,
}

impl WriteFlags {
    /// Parse a flags string, rejecting flags that lack write intent
    ///
    /// # Examples
    ///
    /// ```
    /// use api_docs_dl::flags::{WriteFlags, WriteMode};
    ///
    /// assert_eq!(WriteFlags::parse("wx").unwrap().mode(), WriteMode::ExclusiveCreate);
    /// assert_eq!(WriteFlags::parse("w").unwrap().mode(), WriteMode::WriteTruncate);
    /// assert!(WriteFlags::parse("r").is_err());
    /// ```
    pub fn parse(flags: &str) -> Result<Self> {
        if let Some(bad) = flags.chars().find(|c| !matches!(c, 'r' | 'w' | 'a' | 'x' | '+' | 's'))
        {
            return Err(Error::config(
                "file_write.flags",
                format!("unrecognized flag {bad:?} in {flags:?}"),
            ));
        }

        let write = flags.contains('w');
        let append = flags.contains('a');
        if !write && !append {
            return Err(Error::config(
                "file_write.flags",
                format!("flags {flags:?} must include write access ('w' or 'a')"),
            ));
        }

        Ok(Self {
            append,
            exclusive: flags.contains('x'),
        })
    }

    /// Whether the file must not exist beforehand
    #[must_use]
    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    /// Whether writes are appended to existing content
    #[must_use]
    pub fn is_append(&self) -> bool {
        self.append
    }

    /// Write mode implied by these flags. Append wins over exclusive.
    #[must_use]
    pub fn mode(&self) -> WriteMode {
        if self.append {
            WriteMode::Append
        } else if self.exclusive {
            WriteMode::ExclusiveCreate
        } else {
            WriteMode::WriteTruncate
        }
    }

    /// Path that is actually opened for writing `destination`
    #[must_use]
    pub fn target_path(&self, destination: &Path) -> PathBuf {
        match self.mode() {
            WriteMode::WriteTruncate => staging_path(destination),
            WriteMode::ExclusiveCreate | WriteMode::Append => destination.to_path_buf(),
        }
    }
}

/// `destination` with [`STAGING_SUFFIX`] appended to its file name
#[must_use]
pub fn staging_path(destination: &Path) -> PathBuf {
    let mut staged = destination.as_os_str().to_owned();
    staged.push(STAGING_SUFFIX);
    PathBuf::from(staged)
}
