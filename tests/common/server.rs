//! Mock API server helpers

use super::fixtures::DISCOVERY_PATH;
use api_docs_dl::{Config, FileWriteOptions};
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Start a mock server serving `discovery` as its discovery document
pub async fn start_api(discovery: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DISCOVERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(discovery))
        .mount(&server)
        .await;
    server
}

/// Serve `body` at `at`
pub async fn serve(server: &MockServer, at: &str, body: &str) {
    serve_after(server, at, body, Duration::ZERO).await;
}

/// Serve `body` at `at` once `delay` has passed
pub async fn serve_after(server: &MockServer, at: &str, body: &str, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Answer requests to `at` with `status` and no body
pub async fn fail_with(server: &MockServer, at: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Configuration pointing at `server`, writing into `output_dir` with `flags`
pub fn config_for(server: &MockServer, output_dir: &Path, flags: &str) -> Config {
    Config {
        discovery_url: format!("{}{}", server.uri(), DISCOVERY_PATH),
        output_dir: output_dir.to_path_buf(),
        file_write: FileWriteOptions {
            flags: flags.to_string(),
            mode: None,
        },
        ..Default::default()
    }
}
