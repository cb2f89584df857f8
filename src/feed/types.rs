use serde::{Deserialize, Serialize};

/// Source label used when an item carries no `<source>` element.
pub const DEFAULT_SOURCE: &str = "Google News";

/// One news entry from the feed.
///
/// `title`, `link` and `pub_date` are passed through exactly as the feed
/// provides them. `description` is plain text with markup removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub pub_date: String,
    pub description: String,
    pub source: String,
    /// Publisher home page from the `url` attribute of `<source>`, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// Channel-level metadata, passed through unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedMetadata {
    pub last_build_date: String,
    pub generator: String,
    pub title: String,
    pub language: String,
}

/// Result of a single feed call. Items keep document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsResponse {
    pub items: Vec<NewsItem>,
    pub metadata: FeedMetadata,
}
