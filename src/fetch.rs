//! JSON fetching over HTTP

use crate::discovery::DiscoveryDocument;
use crate::error::{Error, ResponseStatusError, Result};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use url::Url;

/// Media type requested for every document
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// GET `url` and return the unread response
///
/// Sends `Accept: application/json` unless `headers` sets `Accept` itself.
/// Responses with a status outside 200-299 fail with
/// [`Error::HttpStatus`] without reading the body.
pub async fn fetch_json(
    client: &reqwest::Client,
    url: &Url,
    headers: &HeaderMap,
) -> Result<reqwest::Response> {
    let mut request_headers = headers.clone();
    if !request_headers.contains_key(ACCEPT) {
        request_headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
    }

    let method = reqwest::Method::GET;
    let response = client
        .request(method.clone(), url.clone())
        .headers(request_headers)
        .send()
        .await?;

    if !response.status().is_success() {
        let err = ResponseStatusError::from_response(&method, &response);
        tracing::debug!(url = %url, status = err.status, "unsuccessful response status");
        return Err(Error::HttpStatus(err));
    }

    Ok(response)
}

/// Fetch and parse the discovery document at `url`
pub async fn fetch_discovery_document(
    client: &reqwest::Client,
    url: &Url,
    headers: &HeaderMap,
) -> Result<DiscoveryDocument> {
    let response = fetch_json(client, url, headers).await?;
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
