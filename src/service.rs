//! The news feed service: validate, build the URL, fetch, parse, project.
//!
//! Every call is independent. The only state a [`NewsService`] holds is its
//! transport, the base endpoint and the [`ServiceDefaults`], none of which
//! change after construction.

use thiserror::Error;

use crate::feed::{
    build_url, parse_feed, FetchError, HttpTransport, NewsResponse, Transport, DEFAULT_BASE_URL,
};
use crate::params::{sanitize, validate, NewsParams, ServiceDefaults, ValidationError};

/// The two ways a news call can fail.
///
/// [`NewsError::Validation`] is always raised before any request is made.
/// [`NewsError::Fetch`] covers transport, status and parse failures.
#[derive(Debug, Error)]
pub enum NewsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl NewsError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}

/// Client for the Google News RSS endpoint.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> Result<(), gnews::NewsError> {
/// use gnews::{NewsParams, NewsService};
///
/// let service = NewsService::new();
/// let news = service
///     .get_news(&NewsParams::new().language("ja").country("jp"))
///     .await?;
/// for item in &news.items {
///     println!("{} ({})", item.title, item.source);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NewsService<T = HttpTransport> {
    transport: T,
    base_url: String,
    defaults: ServiceDefaults,
}

impl NewsService<HttpTransport> {
    pub fn new() -> Self {
        Self::with_transport(HttpTransport::default())
    }
}

impl Default for NewsService<HttpTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> NewsService<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
            defaults: ServiceDefaults::default(),
        }
    }

    /// Replaces the root RSS endpoint (mirrors, test servers).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn defaults(mut self, defaults: ServiceDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn service_defaults(&self) -> &ServiceDefaults {
        &self.defaults
    }

    /// Validates `params` and returns the URL [`get_news`](Self::get_news) would request.
    pub fn request_url(&self, params: &NewsParams) -> Result<String, ValidationError> {
        validate(params)?;
        Ok(build_url(&self.base_url, &sanitize(params), &self.defaults))
    }

    /// Fetches and parses the feed for `params`.
    ///
    /// Issues exactly one request, and none at all when validation fails.
    /// Failures are never retried.
    pub async fn get_news(&self, params: &NewsParams) -> Result<NewsResponse, NewsError> {
        let url = self.request_url(params)?;
        tracing::debug!(url = %url, "Requesting news feed");

        let body = self.transport.fetch(&url).await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "News feed request failed");
            e
        })?;

        let response = parse_feed(&body).map_err(|e| {
            tracing::warn!(url = %url, error = %e, "News feed could not be parsed");
            e
        })?;

        tracing::info!(
            url = %url,
            items = response.items.len(),
            title = %response.metadata.title,
            "Fetched news feed"
        );
        Ok(response)
    }
}
