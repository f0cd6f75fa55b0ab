//! Batch downloading: discovery document → selected links → settled outcomes

use crate::config::FileWriteOptions;
use crate::discovery::GroupSelector;
use crate::error::{Error, Result};
use crate::fetch::fetch_discovery_document;
use crate::path_resolver::{PathResolver, is_confined};
use crate::types::{BatchResult, DownloadOutcome, ResourceLink};
use crate::writer::download_json;
use futures::future::join_all;
use reqwest::header::HeaderMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Downloads every document a discovery document points at
///
/// All downloads of a run are started together and awaited together; a
/// failing download never stops its siblings.
#[derive(Clone)]
pub struct BatchDownloader {
    client: reqwest::Client,
    headers: HeaderMap,
    output_dir: PathBuf,
    file_write: FileWriteOptions,
    selector: Arc<dyn GroupSelector>,
    path_resolver: Arc<dyn PathResolver>,
}

/// A link with its resolved URL and destination
struct PlannedDownload {
    url: Url,
    destination: PathBuf,
}

impl BatchDownloader {
    /// Create a downloader writing under `output_dir`
    pub fn new(
        client: reqwest::Client,
        headers: HeaderMap,
        output_dir: impl Into<PathBuf>,
        file_write: FileWriteOptions,
        selector: Arc<dyn GroupSelector>,
        path_resolver: Arc<dyn PathResolver>,
    ) -> Self {
        Self {
            client,
            headers,
            output_dir: output_dir.into(),
            file_write,
            selector,
            path_resolver,
        }
    }

    /// Fetch the discovery document at `discovery_url` and download what it lists
    ///
    /// Fails only when the discovery document cannot be fetched or parsed.
    /// Every selected link yields exactly one outcome, at the link's position.
    pub async fn run(&self, discovery_url: &Url) -> Result<BatchResult> {
        let document =
            fetch_discovery_document(&self.client, discovery_url, &self.headers).await?;
        let links = self.selector.select(document.groups());

        tracing::info!(
            url = %discovery_url,
            groups = document.groups().len(),
            links = links.len(),
            "downloading documents"
        );

        let plans = self.plan_all(discovery_url, &links);
        let downloads = links
            .iter()
            .zip(plans)
            .map(|(link, plan)| self.download_link(discovery_url, link, plan));
        let outcomes = join_all(downloads).await;

        let result = BatchResult::new(outcomes);
        tracing::info!(
            fulfilled = result.fulfilled_count(),
            rejected = result.len() - result.fulfilled_count(),
            "batch finished"
        );
        Ok(result)
    }

    /// Plan every link, refusing any destination an earlier link already claimed
    fn plan_all(&self, discovery_url: &Url, links: &[ResourceLink]) -> Vec<Result<PlannedDownload>> {
        let mut claimed = HashSet::new();
        links
            .iter()
            .map(|link| {
                let planned = self.plan(discovery_url, link)?;
                if !claimed.insert(planned.destination.clone()) {
                    return Err(Error::DuplicateDestination {
                        link: link.href.clone(),
                        path: planned.destination,
                    });
                }
                Ok(planned)
            })
            .collect()
    }

    /// Download a single planned link, capturing any failure as its outcome
    async fn download_link(
        &self,
        discovery_url: &Url,
        link: &ResourceLink,
        plan: Result<PlannedDownload>,
    ) -> DownloadOutcome {
        let planned = match plan {
            Ok(planned) => planned,
            Err(reason) => {
                tracing::warn!(link = %link.href, error = %reason, "skipping link");
                return DownloadOutcome::Rejected {
                    url: discovery_url.join(&link.href).ok(),
                    reason,
                };
            }
        };

        tracing::debug!(
            url = %planned.url,
            path = %planned.destination.display(),
            "downloading"
        );

        match download_json(
            &self.client,
            &planned.url,
            &planned.destination,
            &self.headers,
            &self.file_write,
        )
        .await
        {
            Ok(bytes) => {
                tracing::debug!(url = %planned.url, bytes, "downloaded");
                DownloadOutcome::Fulfilled {
                    url: planned.url,
                    path: planned.destination,
                }
            }
            Err(reason) => {
                tracing::warn!(url = %planned.url, error = %reason, "download failed");
                DownloadOutcome::Rejected {
                    url: Some(planned.url),
                    reason,
                }
            }
        }
    }

    fn plan(&self, discovery_url: &Url, link: &ResourceLink) -> Result<PlannedDownload> {
        let url = discovery_url.join(&link.href)?;
        let relative = self.path_resolver.resolve(discovery_url, link, &url)?;
        // Custom resolvers get the same confinement check as the built-in ones
        if !is_confined(&relative) {
            return Err(Error::PathTraversal {
                link: link.href.clone(),
                reason: format!("{} is outside the output directory", relative.display()),
            });
        }
        Ok(PlannedDownload {
            destination: self.output_dir.join(relative),
            url,
        })
    }

    /// Directory documents are written under
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
