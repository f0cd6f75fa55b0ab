//! # api-docs-dl
//!
//! Downloads a set of JSON API documentation files listed by a discovery
//! document into a local directory.
//!
//! ## Design Philosophy
//!
//! - **Atomic writes** - A document is either fully written or not there at all
//! - **Failure isolation** - One broken document never aborts or corrupts the others
//! - **Untrusted input** - Links from the discovery document can never write
//!   outside the output directory
//! - **Sensible defaults** - Works out of the box with zero configuration
//!
//! ## Quick Start
//!
//! ```no_run
//! use api_docs_dl::{ApiDocsDownloader, Config, DownloadOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         discovery_url: "https://example.com/a/resource_groups".to_string(),
//!         output_dir: "docs".into(),
//!         ..Default::default()
//!     };
//!
//!     let downloader = ApiDocsDownloader::new(config)?;
//!     for outcome in downloader.run().await? {
//!         match outcome {
//!             DownloadOutcome::Fulfilled { url, path } => {
//!                 println!("{url} -> {}", path.display());
//!             }
//!             DownloadOutcome::Rejected { reason, .. } => eprintln!("{reason}"),
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Concurrent batch downloads with settled per-link outcomes
pub mod batch;
/// Configuration types
pub mod config;
/// Discovery document model and link selection
pub mod discovery;
/// Orchestration of a full run
pub mod downloader;
/// Error types
pub mod error;
/// JSON fetching over HTTP
pub mod fetch;
/// File open flags
pub mod flags;
/// Mapping of document URLs to safe local paths
pub mod path_resolver;
/// Shared HTTP connection pool
pub mod transport;
/// Core types
pub mod types;
/// Atomic file writing
pub mod writer;

// Re-export commonly used types
pub use batch::BatchDownloader;
pub use config::{Config, FileWriteOptions};
pub use discovery::{DiscoveryDocument, Group, GroupSelector, LastLinkPerGroup, SupportLevelSelector};
pub use downloader::{ApiDocsDownloader, fetch_api_docs};
pub use error::{Error, ResponseStatusError, Result};
pub use flags::{WriteFlags, WriteMode};
pub use path_resolver::{GroupSlugResolver, PathResolver, UrlPathResolver};
pub use transport::{PooledTransport, Transport};
pub use types::{BatchResult, DownloadOutcome, ResourceLink};
