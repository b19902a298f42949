//! Shared parser error types
//!
//! A resolver that cannot find what it is looking for returns `Ok(None)`.
//! `ParserError` is reserved for failures to reach the provider at all.

use thiserror::Error;

/// Maximum response body size accepted from a provider (16 MB).
pub const MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;

pub type Result<T> = std::result::Result<T, ParserError>;

/// Common error type for every link resolver.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {status} for {url}")]
    Http { status: reqwest::StatusCode, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Too many redirects, stopped at {url}")]
    TooManyRedirects { url: String },

    #[error("Response too large ({size} bytes, max {MAX_RESPONSE_SIZE})")]
    ResponseTooLarge { size: u64 },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ParserError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for ParserError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

impl From<url::ParseError> for ParserError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<::config::ConfigError> for ParserError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
