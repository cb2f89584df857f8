//! Request parameters for a news feed call.
//!
//! Validation and sanitization are deliberately separate steps:
//!
//! - [`validate`] judges the raw, caller-supplied values (case-insensitive code
//!   lookup, length limit on the untrimmed query) and never modifies them.
//! - [`sanitize`] normalizes form only (lower-case codes, trimmed and
//!   percent-encoded query) and never fails.
//!
//! Callers run [`validate`] first, on the original values, then [`sanitize`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum query length, in characters, measured before trimming.
pub const MAX_QUERY_LENGTH: usize = 100;

/// ISO 639-1 language codes accepted as `hl`.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "ar", "bg", "bn", "ca", "cs", "da", "de", "el", "en", "es", "et", "fa", "fi", "fr", "he", "hi",
    "hr", "hu", "id", "it", "ja", "ko", "lt", "lv", "nl", "no", "pl", "pt", "ro", "ru", "sk", "sl",
    "sr", "sv", "ta", "th", "tr", "uk", "vi", "zh",
];

/// ISO 3166-1 alpha-2 country codes accepted as `gl`.
pub const SUPPORTED_COUNTRIES: &[&str] = &[
    "ae", "ar", "at", "au", "be", "bg", "br", "ca", "ch", "cn", "co", "cu", "cz", "de", "eg", "fr",
    "gb", "gr", "hk", "hu", "id", "ie", "il", "in", "it", "jp", "kr", "lt", "lv", "ma", "mx", "my",
    "ng", "nl", "no", "nz", "ph", "pl", "pt", "ro", "rs", "ru", "sa", "se", "sg", "si", "sk", "th",
    "tr", "tw", "ua", "us", "ve", "za",
];

/// Rejections raised before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unsupported language code: {0}")]
    UnsupportedLanguage(String),

    #[error("Unsupported country code: {0}")]
    UnsupportedCountry(String),

    #[error("Query string is too long ({length} characters, max {max})")]
    QueryTooLong { length: usize, max: usize },
}

/// Caller-supplied parameters. Every field is optional; empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsParams {
    pub country: Option<String>,
    pub language: Option<String>,
    pub query: Option<String>,
}

impl NewsParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

/// Parameters in URL-ready form, as produced by [`sanitize`].
///
/// `query` is already percent-encoded and must be embedded verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedParams {
    pub country: Option<String>,
    pub language: Option<String>,
    pub query: Option<String>,
}

/// Fallback country/language applied when a call omits them.
///
/// Codes are validated and lower-cased once, at construction, and never change afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDefaults {
    country: Option<String>,
    language: Option<String>,
}

impl ServiceDefaults {
    pub fn new(country: Option<&str>, language: Option<&str>) -> Result<Self, ValidationError> {
        let params = NewsParams {
            country: country.map(str::to_owned),
            language: language.map(str::to_owned),
            query: None,
        };
        validate(&params)?;
        let SanitizedParams {
            country, language, ..
        } = sanitize(&params);
        Ok(Self { country, language })
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub fn is_supported_language(code: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&code.to_lowercase().as_str())
}

pub fn is_supported_country(code: &str) -> bool {
    SUPPORTED_COUNTRIES.contains(&code.to_lowercase().as_str())
}

/// Checks raw parameters against the supported code tables and the query length limit.
///
/// Checks run in a fixed order (language, country, query) and the first
/// failure is returned.
pub fn validate(params: &NewsParams) -> Result<(), ValidationError> {
    if let Some(language) = present(&params.language) {
        if !is_supported_language(language) {
            return Err(ValidationError::UnsupportedLanguage(language.to_owned()));
        }
    }

    if let Some(country) = present(&params.country) {
        if !is_supported_country(country) {
            return Err(ValidationError::UnsupportedCountry(country.to_owned()));
        }
    }

    if let Some(query) = present(&params.query) {
        let length = query.chars().count();
        if length > MAX_QUERY_LENGTH {
            return Err(ValidationError::QueryTooLong {
                length,
                max: MAX_QUERY_LENGTH,
            });
        }
    }

    Ok(())
}

/// Normalizes parameters for URL embedding. Does not re-validate.
pub fn sanitize(params: &NewsParams) -> SanitizedParams {
    SanitizedParams {
        country: present(&params.country).map(str::to_lowercase),
        language: present(&params.language).map(str::to_lowercase),
        query: present(&params.query).map(|q| urlencoding::encode(q.trim()).into_owned()),
    }
}
