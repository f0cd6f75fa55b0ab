//! Crash-safe writing of downloaded documents
//!
//! Truncating writes go to `<destination>.part` and are renamed onto the
//! destination only once the whole body is on disk, so readers never see a
//! partially written document. Exclusive-create and append writes go straight
//! to the destination: the former fails if the file exists, the latter only
//! ever adds to it.
//!
//! When a download fails after its file was opened, the opened file is
//! removed. Append-mode files are left alone so their earlier content survives.

use crate::config::FileWriteOptions;
use crate::error::{Error, Result};
use crate::fetch::fetch_json;
use crate::flags::{WriteFlags, WriteMode};
use futures::{Stream, StreamExt};
use reqwest::header::HeaderMap;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use url::Url;

/// Download `url` into `destination`
///
/// The flags in `options` are checked before any directory is created, file
/// opened or request sent. The file is opened before the request is made, so
/// an exclusive-create conflict never costs a round trip.
///
/// Returns the number of bytes written.
pub async fn download_json(
    client: &reqwest::Client,
    url: &Url,
    destination: &Path,
    headers: &HeaderMap,
    options: &FileWriteOptions,
) -> Result<u64> {
    let flags = options.write_flags()?;
    let mut staged = StagedFile::open(destination, flags, options.mode).await?;

    let outcome = async {
        let response = fetch_json(client, url, headers).await?;
        let written = staged.write_stream(response.bytes_stream()).await?;
        staged.commit().await?;
        Ok::<u64, Error>(written)
    }
    .await;

    if outcome.is_err() {
        staged.discard().await;
    }
    outcome
}

/// A destination file opened for writing, possibly through a staging file
#[derive(Debug)]
pub struct StagedFile {
    file: Option<File>,
    destination: PathBuf,
    target: PathBuf,
    mode: WriteMode,
}

impl StagedFile {
    /// Create the parent directories of `destination` and open the file to write
    ///
    /// `permissions` sets the Unix mode bits of a newly created file.
    pub async fn open(
        destination: &Path,
        flags: WriteFlags,
        permissions: Option<u32>,
    ) -> Result<Self> {
        if let Some(parent) = destination.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::filesystem("create directory", parent, e))?;
        }

        let mode = flags.mode();
        let target = flags.target_path(destination);

        let mut options = OpenOptions::new();
        options.write(true);
        match mode {
            WriteMode::ExclusiveCreate => {
                options.create_new(true);
            }
            WriteMode::WriteTruncate => {
                options.create(true).truncate(true);
            }
            WriteMode::Append => {
                options.append(true);
                if flags.is_exclusive() {
                    options.create_new(true);
                } else {
                    options.create(true);
                }
            }
        }

        #[cfg(unix)]
        if let Some(bits) = permissions {
            options.mode(bits);
        }
        #[cfg(not(unix))]
        let _ = permissions;

        let file = options
            .open(&target)
            .await
            .map_err(|e| Error::filesystem("open", &target, e))?;

        Ok(Self {
            file: Some(file),
            destination: destination.to_path_buf(),
            target,
            mode,
        })
    }

    /// Path being written (the staging file in truncate mode)
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Final path of the document
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Copy every chunk of `stream` into the file
    ///
    /// Stops at the first stream or write error.
    pub async fn write_stream<S, B, E>(&mut self, stream: S) -> Result<u64>
    where
        S: Stream<Item = std::result::Result<B, E>>,
        B: AsRef<[u8]>,
        E: Into<Error>,
    {
        let file = self.file.as_mut().ok_or_else(|| {
            Error::filesystem(
                "write",
                &self.target,
                std::io::Error::other("file already closed"),
            )
        })?;

        let mut stream = std::pin::pin!(stream);
        let mut written: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(Into::into)?;
            let bytes = chunk.as_ref();
            file.write_all(bytes)
                .await
                .map_err(|e| Error::filesystem("write", &self.target, e))?;
            written += bytes.len() as u64;
        }
        Ok(written)
    }

    /// Flush and close the file, then move a staging file into place
    pub async fn commit(&mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()
                .await
                .map_err(|e| Error::filesystem("flush", &self.target, e))?;
            file.sync_all()
                .await
                .map_err(|e| Error::filesystem("sync", &self.target, e))?;
        }

        if self.target != self.destination {
            tokio::fs::rename(&self.target, &self.destination)
                .await
                .map_err(|e| Error::filesystem("rename", &self.target, e))?;
        }
        Ok(())
    }

    /// Close and remove the file, unless appending
    ///
    /// Removal failures are logged, not returned, so the caller can report
    /// the error that caused the discard.
    pub async fn discard(mut self) {
        drop(self.file.take());

        if self.mode == WriteMode::Append {
            return;
        }

        if let Err(e) = tokio::fs::remove_file(&self.target).await
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(
                path = %self.target.display(),
                error = %e,
                "failed to remove partial file"
            );
        }
    }
}
