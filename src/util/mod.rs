//! Utility functions shared by the library and the command-line front end.
//!
//! - **Text processing**: HTML-to-text conversion for feed descriptions and
//!   terminal-safe output
//! - **URL validation**: checks for the configured feed endpoint

mod text;
mod url_validator;

pub use text::{strip_control_chars, strip_html_tags};
pub use url_validator::{validate_base_url, UrlValidationError};
