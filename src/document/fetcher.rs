use super::parse::{from_value, ParsedDocument};
use crate::nav::StructuralError;
use futures::StreamExt;
use serde_json::Value;
use thiserror::Error;

const MAX_DOCUMENT_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur while fetching the navigation document.
///
/// There is no retry and no timeout: a failure leaves the navigation
/// unrendered until the user reloads.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Body was not valid JSON
    #[error("Malformed JSON: {0}")]
    Json(serde_json::Error),
    /// JSON root was not an array
    #[error(transparent)]
    Structural(StructuralError),
}

/// Fetch and parse the navigation document at `url`.
pub async fn fetch_document(
    client: &reqwest::Client,
    url: &str,
) -> Result<ParsedDocument, FetchError> {
    tracing::debug!(url = %url, "Fetching navigation document");

    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    let bytes = read_limited_bytes(response, MAX_DOCUMENT_SIZE).await?;
    let value: Value = serde_json::from_slice(&bytes).map_err(FetchError::Json)?;
    let doc = from_value(value).map_err(FetchError::Structural)?;

    tracing::info!(
        url = %url,
        nodes = doc.nodes.len(),
        rejected = doc.rejected.len(),
        "Fetched navigation document"
    );
    Ok(doc)
}

/// Read a response body, failing once it grows past `limit` bytes.
pub(crate) async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}
