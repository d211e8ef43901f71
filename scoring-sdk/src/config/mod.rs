//! Configuration for scoring clients

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::{Result, ScoringError};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Connection settings for a scoring endpoint
///
/// Endpoint and token are optional so a client can be constructed before they
/// are known; `credentials` reports the missing value on first use.
#[derive(Clone, PartialEq)]
pub struct ScoringConfig {
    /// Full URL of the scoring endpoint
    pub endpoint: Option<String>,

    /// Bearer token sent in the `Authorization` header
    pub token: Option<String>,

    /// Timeout in seconds for the whole request
    pub timeout_seconds: u64,

    /// Skip TLS certificate validation. Test environments only.
    pub accept_invalid_certs: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            token: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            accept_invalid_certs: false,
        }
    }
}

impl fmt::Debug for ScoringConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoringConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

impl ScoringConfig {
    pub fn new(endpoint: Option<String>, token: Option<String>) -> Self {
        Self {
            endpoint,
            token,
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn is_complete(&self) -> bool {
        self.credentials().is_ok()
    }

    /// Endpoint and token, or a `Configuration` error naming what is missing
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let endpoint = self
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| ScoringError::configuration("scoring endpoint (URL) is not set"))?;
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ScoringError::configuration("scoring token (TOKEN) is not set"))?;

        Ok((endpoint, token))
    }

    /// Check that the configuration can be used for a scoring call
    pub fn validate(&self) -> Result<()> {
        let (endpoint, _) = self.credentials()?;

        let url = Url::parse(endpoint).map_err(|e| {
            ScoringError::configuration(format!("Invalid scoring endpoint '{}': {}", endpoint, e))
        })?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ScoringError::configuration(format!(
                    "Unsupported scheme '{}' for scoring endpoint",
                    other
                )))
            }
        }

        if self.timeout_seconds == 0 {
            return Err(ScoringError::configuration("timeout must be at least one second"));
        }

        Ok(())
    }
}
