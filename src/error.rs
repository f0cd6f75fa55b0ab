//! Error types for api-docs-dl
//!
//! Errors fall into two groups:
//! - Batch-fatal errors (configuration, discovery document fetch/parse) that
//!   reject a whole run
//! - Per-item errors (path traversal, HTTP status, filesystem) that are
//!   captured as a single [`DownloadOutcome::Rejected`](crate::types::DownloadOutcome)

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for api-docs-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for api-docs-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "file_write.flags")
        key: Option<String>,
    },

    /// A link would be written outside of the output directory
    #[error("unsafe path for {link}: {reason}")]
    PathTraversal {
        /// The offending link, as found in the discovery document
        link: String,
        /// Why the link was refused
        reason: String,
    },

    /// Another link of the same batch is already written to this path
    #[error("{link} resolves to {}, which an earlier link already writes", path.display())]
    DuplicateDestination {
        /// The skipped link
        link: String,
        /// The shared destination
        path: PathBuf,
    },

    /// Response with a non-success HTTP status
    #[error(transparent)]
    HttpStatus(#[from] ResponseStatusError),

    /// Filesystem operation failed
    #[error("failed to {operation} {}: {source}", path.display())]
    Filesystem {
        /// The operation that failed (e.g., "open", "rename")
        operation: &'static str,
        /// The path the operation was applied to
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Malformed URL
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Discovery document could not be parsed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP transport was used after it was shut down
    #[error("HTTP transport has been shut down")]
    TransportClosed,
}

impl Error {
    /// Build a [`Error::Config`] for the given key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Build a [`Error::Filesystem`] from an I/O error
    pub fn filesystem(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Error::Filesystem {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Whether this error can only come from the configuration or discovery stage
    ///
    /// Per-item errors never reject a batch; these do.
    #[must_use]
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, Error::Config { .. } | Error::Serialization(_))
    }
}

/// Error resulting from the HTTP status code of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseStatusError {
    /// Request method
    pub method: String,
    /// URL of the response (after redirects)
    pub url: String,
    /// Numeric status code
    pub status: u16,
    /// Canonical reason phrase, empty when unknown
    pub status_text: String,
}

impl ResponseStatusError {
    /// Capture the status of a response to a `method` request
    pub fn from_response(method: &reqwest::Method, response: &reqwest::Response) -> Self {
        let status = response.status();
        Self {
            method: method.as_str().to_string(),
            url: response.url().to_string(),
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}

impl fmt::Display for ResponseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} response status {} {}",
            self.method, self.url, self.status, self.status_text
        )
    }
}

impl std::error::Error for ResponseStatusError {}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_status_error_message_names_method_url_and_status() {
        let err = ResponseStatusError {
            method: "GET".into(),
            url: "https://example.com/a/todos".into(),
            status: 404,
            status_text: "Not Found".into(),
        };
        assert_eq!(
            err.to_string(),
            "GET https://example.com/a/todos response status 404 Not Found"
        );

        // Transparent: the wrapped message is not prefixed
        let wrapped = Error::from(err);
        assert_eq!(
            wrapped.to_string(),
            "GET https://example.com/a/todos response status 404 Not Found"
        );
    }

    #[test]
    fn filesystem_error_includes_operation_and_path() {
        let err = Error::filesystem(
            "rename",
            "/tmp/out/todos.json.part",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("failed to rename /tmp/out/todos.json.part"));
        assert!(msg.contains("denied"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn config_helper_sets_key() {
        match Error::config("file_write.flags", "flags must include write access") {
            Error::Config { message, key } => {
                assert_eq!(key.as_deref(), Some("file_write.flags"));
                assert_eq!(message, "flags must include write access");
            }
            other => panic!("expected Config, got {other:?}"),
        }
    }

    #[test]
    fn batch_fatal_classification() {
        assert!(Error::config("output_dir", "empty").is_batch_fatal());
        assert!(
            Error::Serialization(serde_json::from_str::<u8>("x").unwrap_err()).is_batch_fatal()
        );

        assert!(
            !Error::PathTraversal {
                link: "../x".into(),
                reason: "escapes".into()
            }
            .is_batch_fatal()
        );
        assert!(!Error::TransportClosed.is_batch_fatal());
        assert!(
            !Error::filesystem("open", "x", std::io::Error::other("boom")).is_batch_fatal()
        );
    }
}
