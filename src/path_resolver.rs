//! Mapping of remote document URLs to local file paths
//!
//! Discovery documents are untrusted input, so every path produced here is
//! relative and confined to the output directory. A link whose decoded path
//! climbs above the output directory is refused with [`Error::PathTraversal`].

use crate::error::{Error, Result};
use crate::types::ResourceLink;
use std::path::{Path, PathBuf};
use url::Url;

/// File name used for links that end at a directory boundary
pub const INDEX_FILE_NAME: &str = "index.json";

/// Extension appended to file names that have none
pub const DEFAULT_EXTENSION: &str = "json";

/// Strategy for choosing where a downloaded document is written
///
/// Implementations must return a relative path that stays inside the output
/// directory.
pub trait PathResolver: Send + Sync {
    /// Local path, relative to the output directory, for `target`
    ///
    /// `target` is `link.href` resolved against `discovery_url`.
    fn resolve(&self, discovery_url: &Url, link: &ResourceLink, target: &Url) -> Result<PathBuf>;
}

/// Names files after the URL path of each document (default)
#[derive(Clone, Copy, Debug, Default)]
pub struct UrlPathResolver;

impl PathResolver for UrlPathResolver {
    fn resolve(&self, discovery_url: &Url, _link: &ResourceLink, target: &Url) -> Result<PathBuf> {
        resolve_local_path(discovery_url, target)
    }
}

/// Names files after the slug of the group name, e.g. `rfis.json`
#[derive(Clone, Copy, Debug, Default)]
pub struct GroupSlugResolver;

impl PathResolver for GroupSlugResolver {
    fn resolve(&self, _discovery_url: &Url, link: &ResourceLink, _target: &Url) -> Result<PathBuf> {
        let slug = group_name_to_slug(&link.group);
        if slug.is_empty() {
            return Err(Error::PathTraversal {
                link: link.group.clone(),
                reason: "group name has no characters usable in a file name".to_string(),
            });
        }
        Ok(PathBuf::from(format!("{slug}.{DEFAULT_EXTENSION}")))
    }
}

/// Compute the local path for `target`
///
/// The path is taken relative to the directory of `discovery_url` when
/// `target` lives below it, and from the root of `target` otherwise. The query
/// and fragment are ignored.
///
/// # Examples
///
/// ```
/// use api_docs_dl::path_resolver::resolve_local_path;
/// use std::path::PathBuf;
/// use url::Url;
///
/// let discovery = Url::parse("https://x/a/resource_groups").unwrap();
/// let target = discovery.join("/a/todos?v=2").unwrap();
/// assert_eq!(resolve_local_path(&discovery, &target).unwrap(), PathBuf::from("todos.json"));
/// ```
pub fn resolve_local_path(discovery_url: &Url, target: &Url) -> Result<PathBuf> {
    let target_path = target.path();
    let prefix = directory_prefix(discovery_url.path());
    let relative = target_path
        .strip_prefix(prefix)
        .unwrap_or_else(|| target_path.trim_start_matches('/'));

    let decoded = urlencoding::decode(relative).map_err(|e| Error::PathTraversal {
        link: target.to_string(),
        reason: format!("path is not valid UTF-8 once decoded: {e}"),
    })?;

    let mut path = normalize(&decoded).ok_or_else(|| Error::PathTraversal {
        link: target.to_string(),
        reason: "path escapes the output directory".to_string(),
    })?;

    if ends_at_directory(&decoded) {
        path.push(INDEX_FILE_NAME);
    } else if path.extension().is_none() {
        let mut file_name = path.file_name().unwrap_or_default().to_owned();
        file_name.push(".");
        file_name.push(DEFAULT_EXTENSION);
        path.set_file_name(file_name);
    }

    Ok(path)
}

/// Convert a group name into the slug used for its file name
///
/// Lowercases, turns each whitespace character into `-` and drops anything
/// that is not an ASCII letter, digit or `-`.
///
/// # Examples
///
/// ```
/// use api_docs_dl::path_resolver::group_name_to_slug;
///
/// assert_eq!(group_name_to_slug("Line Item Types (Cost Types)"), "line-item-types-cost-types");
/// assert_eq!(group_name_to_slug("RFIs"), "rfis");
/// ```
#[must_use]
pub fn group_name_to_slug(name: &str) -> String {
    name.chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('-')
            } else if c.is_ascii_alphanumeric() || c == '-' {
                Some(c.to_ascii_lowercase())
            } else {
                None
            }
        })
        .collect()
}

/// Path up to and including its last `/`
fn directory_prefix(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..=idx],
        None => "",
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Resolve `.` and `..` segments; `None` if the path climbs above its start
fn normalize(decoded: &str) -> Option<PathBuf> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split(is_separator) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            // Drive prefixes and stream names on Windows
            s if cfg!(windows) && s.contains(':') => return None,
            s => segments.push(s),
        }
    }
    Some(segments.iter().collect::<PathBuf>())
}

fn ends_at_directory(decoded: &str) -> bool {
    let last = decoded.rsplit(is_separator).next().unwrap_or_default();
    matches!(last, "" | "." | "..")
}

/// Whether `path` is relative and free of `..` components
#[must_use]
pub fn is_confined(path: &Path) -> bool {
    path.is_relative()
        && path
            .components()
            .all(|c| matches!(c, std::path::Component::Normal(_)))
}
