use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;

use super::parser::{parse_document, RawFeedDocument};

/// Identifying user-agent sent with every feed request.
pub const USER_AGENT: &str = concat!("graze/", env!("CARGO_PKG_VERSION"));

/// Per-request deadline. The shared client carries the same bound, so a
/// stalled connection cannot hang a collection cycle.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Everything that can go wrong retrieving one feed document.
///
/// The collection cycle treats every variant as a single "fetch failed"
/// condition. There are no retries at this layer: a failed feed is simply
/// fetched again once it is next the most overdue one.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Request exceeded the 30-second deadline
    #[error("request timed out")]
    Timeout,
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the 10MB size limit
    #[error("response too large")]
    ResponseTooLarge,
    /// Body could not be decoded as a channel/item feed document
    #[error("feed could not be decoded: {0}")]
    Decode(#[from] quick_xml::DeError),
}

/// Build the HTTP client shared by every fetch in the process. The timeout
/// is set here explicitly rather than left to the caller's cancellation.
pub fn build_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()
}

/// One GET against `url`, decoded into the raw channel/item document.
pub async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
) -> Result<RawFeedDocument, FetchError> {
    let response = tokio::time::timeout(FETCH_TIMEOUT, client.get(url).send())
        .await
        .map_err(|_| FetchError::Timeout)?
        .map_err(FetchError::Network)?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    let bytes = read_limited_bytes(response, MAX_FEED_SIZE).await?;
    Ok(parse_document(&bytes)?)
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: trust an honest Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
