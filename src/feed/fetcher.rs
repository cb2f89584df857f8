use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;

/// Default cap on a feed body. Google News feeds are well under 1MB.
pub const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors raised after validation: retrieving the feed or making sense of it.
///
/// Each variant names the phase that failed. Malformed markup and a
/// well-formed document with the wrong shape are both [`FetchError::Parse`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or body-read failure
    #[error("Network error: {0}")]
    Network(String),
    /// The transport's own timeout elapsed
    #[error("Network error: request timed out")]
    Timeout,
    /// Response with a non-2xx status code
    #[error("Failed to fetch RSS feed: {status} {reason}")]
    HttpStatus { status: u16, reason: String },
    /// Response body exceeded the configured size limit
    #[error("Failed to fetch RSS feed: response exceeds {0} bytes")]
    ResponseTooLarge(usize),
    /// Body is not a feed document of the expected shape
    #[error("Failed to parse RSS feed: {0}")]
    Parse(String),
}

impl FetchError {
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse(reason.into())
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Retrieves the body of a URL.
///
/// A success is the body text of a 2xx response. Network failures and
/// non-success statuses are both errors. Implementations must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Builds the HTTP client used by [`HttpTransport`].
///
/// Without `timeout` no total deadline is set and requests run until the
/// connection itself fails.
pub fn http_client(
    timeout: Option<Duration>,
    user_agent: &str,
) -> Result<reqwest::Client, FetchError> {
    let mut builder = reqwest::Client::builder().user_agent(user_agent);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(FetchError::from_reqwest)
}

/// [`Transport`] over a `reqwest::Client`: one GET per call, body size capped.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            max_body_bytes: MAX_FEED_SIZE,
        }
    }

    #[must_use]
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let bytes = read_limited_bytes(response, self.max_body_bytes).await?;
        tracing::debug!(url = %url, bytes = bytes.len(), "Feed body received");

        String::from_utf8(bytes).map_err(|_| FetchError::parse("response body is not valid UTF-8"))
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::from_reqwest)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
