use crate::params::{SanitizedParams, ServiceDefaults};

/// Root RSS endpoint of Google News.
pub const DEFAULT_BASE_URL: &str = "https://news.google.com/rss";

/// Builds the feed URL for already-sanitized parameters.
///
/// - Non-empty query: `{base}/search?q=<query>`, otherwise `{base}`
/// - `gl` from the call's country, else the default country
/// - `hl` from the call's language, else the default language
///
/// Pairs are joined with `&`; the first one after the path uses `?` unless the
/// search path already introduced a query string. The query value is embedded
/// verbatim since [`crate::params::sanitize`] has already percent-encoded it.
pub fn build_url(base_url: &str, params: &SanitizedParams, defaults: &ServiceDefaults) -> String {
    let base_url = base_url.trim_end_matches('/');

    let mut url = match params.query.as_deref().filter(|q| !q.is_empty()) {
        Some(query) => format!("{base_url}/search?q={query}"),
        None => base_url.to_string(),
    };

    let country = params.country.as_deref().or(defaults.country());
    let language = params.language.as_deref().or(defaults.language());

    let mut pairs = Vec::with_capacity(2);
    if let Some(country) = country {
        pairs.push(format!("gl={country}"));
    }
    if let Some(language) = language {
        pairs.push(format!("hl={language}"));
    }

    if !pairs.is_empty() {
        let separator = if url.contains('?') { '&' } else { '?' };
        url.push(separator);
        url.push_str(&pairs.join("&"));
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{sanitize, NewsParams};
    use pretty_assertions::assert_eq;

    fn url_for(params: NewsParams) -> String {
        build_url(
            DEFAULT_BASE_URL,
            &sanitize(&params),
            &ServiceDefaults::default(),
        )
    }

    #[test]
    fn test_root_feed_without_params() {
        assert_eq!(url_for(NewsParams::new()), "https://news.google.com/rss");
    }

    #[test]
    fn test_country_and_language_appended_in_order() {
        assert_eq!(
            url_for(NewsParams::new().language("JA").country("JP")),
            "https://news.google.com/rss?gl=jp&hl=ja"
        );
    }

    #[test]
    fn test_language_only() {
        assert_eq!(
            url_for(NewsParams::new().language("en")),
            "https://news.google.com/rss?hl=en"
        );
    }

    #[test]
    fn test_search_variant_puts_query_first() {
        assert_eq!(
            url_for(NewsParams::new().query(" rust lang ").language("en").country("us")),
            "https://news.google.com/rss/search?q=rust%20lang&gl=us&hl=en"
        );
    }

    #[test]
    fn test_search_without_codes() {
        assert_eq!(
            url_for(NewsParams::new().query("tokio")),
            "https://news.google.com/rss/search?q=tokio"
        );
    }

    #[test]
    fn test_blank_query_uses_root_path() {
        assert_eq!(
            url_for(NewsParams::new().query("   ").country("de")),
            "https://news.google.com/rss?gl=de"
        );
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let defaults = ServiceDefaults::new(Some("jp"), Some("ja")).unwrap();

        let url = build_url(DEFAULT_BASE_URL, &sanitize(&NewsParams::new()), &defaults);
        assert_eq!(url, "https://news.google.com/rss?gl=jp&hl=ja");

        let params = sanitize(&NewsParams::new().language("EN"));
        let url = build_url(DEFAULT_BASE_URL, &params, &defaults);
        assert_eq!(url, "https://news.google.com/rss?gl=jp&hl=en");
    }

    #[test]
    fn test_trailing_slash_on_base_is_ignored() {
        let url = build_url(
            "http://127.0.0.1:8080/rss/",
            &sanitize(&NewsParams::new().query("x")),
            &ServiceDefaults::default(),
        );
        assert_eq!(url, "http://127.0.0.1:8080/rss/search?q=x");
    }

    #[test]
    fn test_deterministic() {
        let params = NewsParams::new().query("same").language("fr").country("fr");
        assert_eq!(url_for(params.clone()), url_for(params));
    }
}
