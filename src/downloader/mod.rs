//! Top-level entry point: configuration, transport ownership and the batch run.
//!
//! The default strategies depend on the discovery URL. A resource-groups
//! document is read with [`LastLinkPerGroup`] and URL-derived file names. A
//! `groups.json` index lists no links, so it is read with
//! [`SupportLevelSelector`] and slug file names.
//!
//! [`ApiDocsDownloader`] resolves the configured defaults, decides which
//! [`Transport`] a run uses and hands the work to [`BatchDownloader`]. A
//! transport created by the downloader is shut down after every run, whether
//! the run succeeded or not. A transport supplied with
//! [`ApiDocsDownloader::with_transport`] belongs to the caller and is left
//! running.

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use crate::batch::BatchDownloader;
use crate::config::Config;
use crate::discovery::{GroupSelector, LastLinkPerGroup, SupportLevelSelector, is_groups_index};
use crate::error::Result;
use crate::path_resolver::{GroupSlugResolver, PathResolver, UrlPathResolver};
use crate::transport::{PooledTransport, Transport};
use crate::types::BatchResult;
use reqwest::header::HeaderMap;
use std::sync::Arc;
use url::Url;

/// Downloads a documentation set described by a [`Config`]
#[derive(Clone)]
pub struct ApiDocsDownloader {
    config: Arc<Config>,
    discovery_url: Url,
    headers: HeaderMap,
    transport: Option<Arc<dyn Transport>>,
    selector: Arc<dyn GroupSelector>,
    path_resolver: Arc<dyn PathResolver>,
}

impl ApiDocsDownloader {
    /// Validate `config` and build a downloader with the default strategies
    ///
    /// No network or filesystem access happens here.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let discovery_url = config.discovery_url()?;
        let headers = config.header_map()?;
        let (selector, path_resolver) = default_strategies(&discovery_url);

        Ok(Self {
            config: Arc::new(config),
            discovery_url,
            headers,
            transport: None,
            selector,
            path_resolver,
        })
    }

    /// Send every request through `transport` instead of a per-run pool
    ///
    /// The transport is never shut down by the downloader.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Choose which links are downloaded (default depends on the discovery URL)
    #[must_use]
    pub fn with_selector(mut self, selector: impl GroupSelector + 'static) -> Self {
        self.selector = Arc::new(selector);
        self
    }

    /// Choose where each document is written (default depends on the discovery URL)
    #[must_use]
    pub fn with_path_resolver(mut self, resolver: impl PathResolver + 'static) -> Self {
        self.path_resolver = Arc::new(resolver);
        self
    }

    /// The validated configuration
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Download every selected document
    ///
    /// Fails only for batch-wide problems (transport construction, discovery
    /// document fetch or parse); per-document failures are reported in the
    /// returned [`BatchResult`].
    pub async fn run(&self) -> Result<BatchResult> {
        match &self.transport {
            Some(shared) => self.run_with(shared.as_ref()).await,
            None => {
                let owned = PooledTransport::new(&self.config)?;
                let result = self.run_with(&owned).await;
                owned.shutdown().await;
                result
            }
        }
    }

    async fn run_with(&self, transport: &dyn Transport) -> Result<BatchResult> {
        let batch = BatchDownloader::new(
            transport.client()?,
            self.headers.clone(),
            self.config.output_dir.clone(),
            self.config.file_write.clone(),
            Arc::clone(&self.selector),
            Arc::clone(&self.path_resolver),
        );
        batch.run(&self.discovery_url).await
    }
}

fn default_strategies(discovery_url: &Url) -> (Arc<dyn GroupSelector>, Arc<dyn PathResolver>) {
    if is_groups_index(discovery_url) {
        (
            Arc::new(SupportLevelSelector::default()),
            Arc::new(GroupSlugResolver),
        )
    } else {
        (Arc::new(LastLinkPerGroup), Arc::new(UrlPathResolver))
    }
}

/// Download the documentation set described by `config` with default strategies
///
/// # Example
///
/// ```no_run
/// use api_docs_dl::{Config, fetch_api_docs};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config {
///         discovery_url: "https://example.com/a/resource_groups".to_string(),
///         output_dir: "docs".into(),
///         ..Default::default()
///     };
///
///     let result = fetch_api_docs(config).await?;
///     for reason in result.failures() {
///         eprintln!("{reason}");
///     }
///     Ok(())
/// }
/// ```
pub async fn fetch_api_docs(config: Config) -> Result<BatchResult> {
    ApiDocsDownloader::new(config)?.run().await
}
