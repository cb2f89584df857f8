use thiserror::Error;
use url::Url;

/// Errors from checking a configured feed endpoint.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The endpoint already carries a query string or fragment, which would
    /// collide with the `?q=`/`gl=`/`hl=` pairs appended per request.
    #[error("Base URL must not contain a query string or fragment: {0}")]
    HasQuery(String),
}

/// Validates the base feed endpoint and returns it without a trailing slash.
///
/// Unlike feed links, the endpoint comes from the operator's own
/// configuration, so loopback hosts are accepted (local mirrors, test servers).
///
/// # Examples
///
/// ```
/// use gnews::util::validate_base_url;
///
/// assert_eq!(
///     validate_base_url("https://news.google.com/rss/").unwrap(),
///     "https://news.google.com/rss"
/// );
/// assert!(validate_base_url("ftp://example.com/rss").is_err());
/// ```
pub fn validate_base_url(url_str: &str) -> Result<String, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(UrlValidationError::HasQuery(url.to_string()));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}
