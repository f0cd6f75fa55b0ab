//! Shared HTTP transport (keep-alive connection pool)
//!
//! A [`Transport`] hands out the [`reqwest::Client`] every request of a batch
//! goes through. Connections are created, acquired and released by the
//! client's pool; [`Transport::shutdown`] tears the pool down.
//!
//! Whoever creates a transport shuts it down. The downloader only shuts down
//! transports it created itself, never one supplied by the caller.

use crate::config::Config;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// Capability interface for the HTTP connection pool
#[async_trait]
pub trait Transport: Send + Sync {
    /// Client sharing this transport's connection pool
    ///
    /// Fails with [`Error::TransportClosed`] after [`Transport::shutdown`].
    fn client(&self) -> Result<reqwest::Client>;

    /// Close idle connections and refuse further use
    async fn shutdown(&self);
}

/// Default transport: one pooled keep-alive [`reqwest::Client`]
#[derive(Debug)]
pub struct PooledTransport {
    client: Mutex<Option<reqwest::Client>>,
}

impl PooledTransport {
    /// Build a transport from the timeouts in `config`
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .pool_idle_timeout(config.pool_idle_timeout)
            .tcp_keepalive(config.pool_idle_timeout);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self::from_client(client))
    }

    /// Wrap an existing client
    #[must_use]
    pub fn from_client(client: reqwest::Client) -> Self {
        Self {
            client: Mutex::new(Some(client)),
        }
    }

    /// Whether [`Transport::shutdown`] has been called
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.client
            .lock()
            .map(|client| client.is_none())
            .unwrap_or(true)
    }
}

#[async_trait]
impl Transport for PooledTransport {
    fn client(&self) -> Result<reqwest::Client> {
        self.client
            .lock()
            .ok()
            .and_then(|client| client.clone())
            .ok_or(Error::TransportClosed)
    }

    async fn shutdown(&self) {
        // Dropping the last client handle closes the pool's idle connections.
        // Handles cloned by in-flight requests keep working until they finish.
        let client = match self.client.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if client.is_some() {
            tracing::debug!("HTTP transport shut down");
        }
    }
}
