//! Error types for depeche operations.
//!
//! This module defines the main error type [`DepecheError`] which represents
//! every failure the pipeline can report: secondary fetches, feed decoding,
//! selector compilation, configuration and file I/O.
//!
//! A selector that matches nothing is not an error. Absent elements are
//! expressed as empty `Vec`s or `None` and produce partial output.
//!
//! # Example
//!
//! ```rust
//! use depeche_core::{DepecheError, FailureCategory, decode_posts};
//!
//! match decode_posts("not json") {
//!     Err(err) => assert_eq!(err.category(), FailureCategory::Decode),
//!     Ok(_) => unreachable!(),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for extraction operations.
#[derive(Error, Debug)]
pub enum DepecheError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other HTTP-related problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid CSS selector or unusable markup.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// Malformed live post feed.
    #[error("Failed to decode live post feed: {0}")]
    DecodeError(String),

    /// A `/Date(...)/` value that cannot be turned into a date.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A hex color that cannot be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read/write errors.
    #[error("Failed to write to file: {0}")]
    WriteError(#[from] std::io::Error),

    /// Configuration file errors.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Coarse classification of a [`DepecheError`].
///
/// Network and decode failures only ever abort a secondary enrichment
/// (comments or live posts); the primary page blocks are always kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    Network,
    Decode,
    Parse,
    Io,
    Config,
}

impl DepecheError {
    /// Returns the failure category of this error.
    pub fn category(&self) -> FailureCategory {
        match self {
            #[cfg(feature = "fetch")]
            DepecheError::HttpError(_) => FailureCategory::Network,
            DepecheError::HttpStatus { .. } | DepecheError::Timeout { .. } | DepecheError::InvalidUrl(_) => {
                FailureCategory::Network
            }
            DepecheError::DecodeError(_) | DepecheError::InvalidDate(_) | DepecheError::InvalidColor(_) => {
                FailureCategory::Decode
            }
            DepecheError::HtmlParseError(_) => FailureCategory::Parse,
            DepecheError::FileNotFound(_) | DepecheError::WriteError(_) => FailureCategory::Io,
            DepecheError::ConfigError(_) => FailureCategory::Config,
        }
    }
}

impl From<serde_json::Error> for DepecheError {
    fn from(err: serde_json::Error) -> Self {
        DepecheError::DecodeError(err.to_string())
    }
}

/// Result type alias for DepecheError.
pub type Result<T> = std::result::Result<T, DepecheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DepecheError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_http_status_error() {
        let err = DepecheError::HttpStatus { status: 404, url: "https://example.com/x".to_string() };
        assert!(err.to_string().contains("404"));
        assert_eq!(err.category(), FailureCategory::Network);
    }

    #[test]
    fn test_timeout_error() {
        let err = DepecheError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn test_json_error_is_decode_failure() {
        let err: DepecheError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(err.category(), FailureCategory::Decode);
    }

    #[test]
    fn test_categories() {
        assert_eq!(DepecheError::InvalidDate("x".into()).category(), FailureCategory::Decode);
        assert_eq!(DepecheError::HtmlParseError("x".into()).category(), FailureCategory::Parse);
        assert_eq!(DepecheError::ConfigError("x".into()).category(), FailureCategory::Config);
        assert_eq!(DepecheError::FileNotFound(PathBuf::from("/x")).category(), FailureCategory::Io);
    }
}
