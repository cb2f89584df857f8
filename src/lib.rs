//! Typed access to Google News RSS feeds.
//!
//! A call takes optional language, country and search query, validates and
//! normalizes them, requests the matching feed once, and returns its items and
//! channel metadata as plain values.
//!
//! ```no_run
//! # async fn run() -> Result<(), gnews::NewsError> {
//! let news = gnews::NewsService::new()
//!     .get_news(&gnews::NewsParams::new().language("en").query("rust"))
//!     .await?;
//! println!("{} items from {}", news.items.len(), news.metadata.title);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod feed;
pub mod params;
pub mod service;
pub mod util;

pub use feed::{FeedMetadata, FetchError, NewsItem, NewsResponse, Transport};
pub use params::{NewsParams, ServiceDefaults, ValidationError};
pub use service::{NewsError, NewsService};
