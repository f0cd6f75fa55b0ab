use super::*;
use crate::config::FileWriteOptions;
use crate::error::Error;
use crate::types::DownloadOutcome;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod transport;

const TODOS_DISCOVERY: &str =
    r#"{"groups":[{"name":"ToDos","links":["/a/todos?v=1","/a/todos?v=2"]}]}"#;

/// Config pointing at `/a/resource_groups` on `server`, writing into `dir`
fn test_config(server: &MockServer, dir: &TempDir) -> Config {
    Config {
        discovery_url: format!("{}/a/resource_groups", server.uri()),
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    }
}

async fn mount_discovery(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/a/resource_groups"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_document(server: &MockServer, at: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Transport that counts how often it is used and shut down
struct CountingTransport {
    inner: PooledTransport,
    clients: AtomicUsize,
    shutdowns: AtomicUsize,
}

impl CountingTransport {
    fn new() -> Self {
        Self {
            inner: PooledTransport::from_client(reqwest::Client::new()),
            clients: AtomicUsize::new(0),
            shutdowns: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Transport for CountingTransport {
    fn client(&self) -> Result<reqwest::Client> {
        self.clients.fetch_add(1, Ordering::SeqCst);
        self.inner.client()
    }

    async fn shutdown(&self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        self.inner.shutdown().await;
    }
}
