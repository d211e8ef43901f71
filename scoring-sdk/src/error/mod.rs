//! Error handling for the Scoring SDK
//!
//! Every failure of a scoring call falls into one of four categories:
//! - configuration problems detected before any network attempt
//! - transport failures (connect, TLS, timeout)
//! - non-success HTTP replies from the scorer
//! - replies whose body does not have the expected shape

use thiserror::Error;

pub mod mapping;

/// Result type for Scoring SDK operations
pub type Result<T> = std::result::Result<T, ScoringError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    /// Endpoint or token missing, or the client could not be configured
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request could not be completed
    #[error("Transport error: {0}")]
    Transport(String),

    /// The scorer answered with a non-success status
    #[error("Scoring service returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The reply body is not the expected JSON structure
    #[error("Response format error: {0}")]
    ResponseFormat(String),
}

impl ScoringError {
    pub fn configuration(message: impl Into<String>) -> Self {
        ScoringError::Configuration(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        ScoringError::Transport(message.into())
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        ScoringError::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn response_format(message: impl Into<String>) -> Self {
        ScoringError::ResponseFormat(message.into())
    }

    /// Short category name, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ScoringError::Configuration(_) => "configuration",
            ScoringError::Transport(_) => "transport",
            ScoringError::Upstream { .. } => "upstream",
            ScoringError::ResponseFormat(_) => "response_format",
        }
    }

    /// True when the failure is local and no request reached the scorer
    pub fn is_configuration(&self) -> bool {
        matches!(self, ScoringError::Configuration(_))
    }
}

impl From<reqwest::Error> for ScoringError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScoringError::transport(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            ScoringError::transport(format!("Connection error: {}", err))
        } else if err.is_redirect() {
            ScoringError::transport(format!("Too many redirects: {}", err))
        } else if err.is_decode() {
            ScoringError::response_format(format!("Response decode error: {}", err))
        } else if err.is_builder() {
            ScoringError::configuration(format!("Invalid request: {}", err))
        } else {
            ScoringError::transport(format!("HTTP client error: {}", err))
        }
    }
}

impl From<serde_json::Error> for ScoringError {
    fn from(err: serde_json::Error) -> Self {
        ScoringError::response_format(format!("JSON error: {}", err))
    }
}
