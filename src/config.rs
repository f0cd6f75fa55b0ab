//! Configuration types for api-docs-dl

use crate::error::{Error, Result};
use crate::flags::WriteFlags;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::PathBuf, time::Duration};
use url::Url;

/// Base URL for REST API documentation JSON
pub const REST_BASE_URL: &str =
    "https://s3-us-west-2.amazonaws.com/procore-api-documentation-production/master/rest_docs/1";

/// Options for the files written for each downloaded document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileWriteOptions {
    /// Open flags (default: "wx", exclusive create)
    ///
    /// `"w"` writes through a `.part` staging file that is renamed into place,
    /// `"a"` appends. See [`crate::flags`].
    #[serde(default = "default_flags")]
    pub flags: String,

    /// Unix permission bits for newly created files (default: process umask)
    #[serde(default)]
    pub mode: Option<u32>,
}

impl Default for FileWriteOptions {
    fn default() -> Self {
        Self {
            flags: default_flags(),
            mode: None,
        }
    }
}

impl FileWriteOptions {
    /// Parse [`FileWriteOptions::flags`]
    pub fn write_flags(&self) -> Result<WriteFlags> {
        WriteFlags::parse(&self.flags)
    }
}

/// Main configuration for [`ApiDocsDownloader`](crate::ApiDocsDownloader)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// URL of the discovery document listing the groups to download
    /// (default: `{REST_BASE_URL}/groups.json`)
    ///
    /// A `groups.json` index is read with the support-level strategy and slug
    /// file names unless other strategies are set on the downloader.
    #[serde(default = "default_discovery_url")]
    pub discovery_url: String,

    /// Directory the documents are written under (default: ".")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// How each document file is opened and written
    #[serde(default)]
    pub file_write: FileWriteOptions,

    /// Extra request headers sent with every request
    ///
    /// `Accept: application/json` is added unless an `Accept` header is set here.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Per-request timeout (default: none)
    #[serde(default, with = "seconds::option")]
    pub request_timeout: Option<Duration>,

    /// How long idle keep-alive connections stay pooled (default: 90 seconds)
    #[serde(default = "default_pool_idle_timeout", with = "seconds")]
    pub pool_idle_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            discovery_url: default_discovery_url(),
            output_dir: default_output_dir(),
            file_write: FileWriteOptions::default(),
            headers: HashMap::new(),
            request_timeout: None,
            pool_idle_timeout: default_pool_idle_timeout(),
        }
    }
}

impl Config {
    /// Check every setting before any I/O happens
    pub fn validate(&self) -> Result<()> {
        self.discovery_url()?;

        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::config(
                "output_dir",
                "output directory must not be empty",
            ));
        }

        self.file_write.write_flags()?;
        self.header_map()?;

        if self.request_timeout == Some(Duration::ZERO) {
            return Err(Error::config(
                "request_timeout",
                "request timeout must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Parsed discovery URL
    pub fn discovery_url(&self) -> Result<Url> {
        Url::parse(&self.discovery_url).map_err(|e| {
            Error::config(
                "discovery_url",
                format!("invalid discovery URL {:?}: {}", self.discovery_url, e),
            )
        })
    }

    /// [`Config::headers`] as a typed header map
    pub fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                Error::config("headers", format!("invalid header name {name:?}: {e}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                Error::config(
                    "headers",
                    format!("invalid value for header {name:?}: {e}"),
                )
            })?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }
}

// Default value functions
fn default_discovery_url() -> String {
    format!("{REST_BASE_URL}/groups.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_flags() -> String {
    "wx".to_string()
}

fn default_pool_idle_timeout() -> Duration {
    Duration::from_secs(90)
}

/// Durations stored as whole seconds
mod seconds {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        value.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }

    /// Same as the parent module, for optional settings
    pub mod option {
        use serde::{Deserialize, Deserializer, Serialize, Serializer};
        use std::time::Duration;

        pub fn serialize<S: Serializer>(
            value: &Option<Duration>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            value.map(|d| d.as_secs()).serialize(serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Duration>, D::Error> {
            Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
        }
    }
}
