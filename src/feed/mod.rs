//! Feed retrieval for the Google News RSS endpoint.
//!
//! The pieces compose into a straight pipeline, driven by
//! [`crate::NewsService`]:
//!
//! - [`request`] - Builds the feed URL from sanitized parameters and defaults
//! - [`fetcher`] - The [`Transport`] seam and its `reqwest` implementation
//! - [`parser`] - Deserializes the RSS document and projects it into a
//!   [`NewsResponse`]
//! - [`types`] - The response value types
//!
//! # Example
//!
//! ```
//! use gnews::feed::{build_url, parse_feed, DEFAULT_BASE_URL};
//! use gnews::params::{sanitize, NewsParams, ServiceDefaults};
//!
//! let params = sanitize(&NewsParams::new().query("rust").language("en"));
//! let url = build_url(DEFAULT_BASE_URL, &params, &ServiceDefaults::default());
//! assert_eq!(url, "https://news.google.com/rss/search?q=rust&hl=en");
//!
//! assert!(parse_feed("invalid xml").is_err());
//! ```

pub mod fetcher;
pub mod parser;
pub mod request;
pub mod types;

pub use fetcher::{http_client, FetchError, HttpTransport, Transport, MAX_FEED_SIZE};
pub use parser::parse_feed;
pub use request::{build_url, DEFAULT_BASE_URL};
pub use types::{FeedMetadata, NewsItem, NewsResponse, DEFAULT_SOURCE};
