//! Sumi-Links: a single-page link extractor
//!
//! This crate fetches one web page with browser-like request headers, parses
//! its HTML and reports every absolute `http`/`https` link found on it, either
//! as a structured result or as a structured error.

pub mod config;
pub mod extractor;
pub mod output;
pub mod url;

use thiserror::Error;

/// Top-level error type for the command-line tool
///
/// Failures of an extraction itself never surface here; they are reported
/// through [`output::FetchError`]. This covers everything around it.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to render report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No URL provided")]
    MissingUrl,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Category of a failed extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The server answered with a 4xx or 5xx status
    HttpStatus,
    /// Socket, DNS or TLS failure before any response
    Connection,
    /// No response within the timeout budget
    Timeout,
    /// Any other transport-level failure
    Request,
    /// Failure while parsing or extracting, or anything uncategorized
    Unexpected,
}

/// Errors raised while fetching and parsing a page
///
/// The display strings are the human-readable messages placed in the
/// `error` field of a failure report.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("HTTP error occurred: {status} {reason} (URL: {url})")]
    HttpStatus {
        status: u16,
        reason: String,
        url: String,
    },

    #[error("Connection error occurred: {0}")]
    Connection(String),

    #[error("Timeout occurred while fetching {url}: {cause}")]
    Timeout { url: String, cause: String },

    #[error("An error occurred during request: {0}")]
    Request(String),

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl ExtractError {
    /// Returns the category tag of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::HttpStatus { .. } => ErrorKind::HttpStatus,
            Self::Connection(_) => ErrorKind::Connection,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Request(_) => ErrorKind::Request,
            Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }
}

/// Result type alias for command-line operations
pub type Result<T> = std::result::Result<T, LinkError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extractor::PageLinkExtractor;
pub use output::{render_json, ExtractOutcome, FetchError, FetchResult};
pub use crate::url::{ensure_scheme, resolve_href};
