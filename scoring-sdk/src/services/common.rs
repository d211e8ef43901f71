//! Common utilities for service clients

use std::fmt;
use std::time::Duration;

use log::warn;
use reqwest::{header, Client};

use crate::error::{Result, ScoringError};

/// UserAgent structure for identifying the client to upstream services
#[derive(Debug, Clone)]
pub struct UserAgent {
    pub app_name: String,
    pub version: String,
    pub extra: Option<String>,
}

impl Default for UserAgent {
    fn default() -> Self {
        Self {
            app_name: "churn-form".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            extra: Some("scoring-sdk".to_string()),
        }
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app_name, self.version)?;

        if let Some(ref extra) = self.extra {
            write!(f, " ({})", extra)?;
        }

        Ok(())
    }
}

/// Build the HTTP client used for scoring calls
///
/// Certificate validation stays on unless `accept_invalid_certs` is set.
pub fn build_http_client(
    user_agent: Option<UserAgent>,
    timeout: Duration,
    accept_invalid_certs: bool,
) -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    let ua = user_agent.unwrap_or_default().to_string();

    headers.insert(
        header::USER_AGENT,
        header::HeaderValue::from_str(&ua)
            .map_err(|e| ScoringError::configuration(format!("Invalid user agent: {}", e)))?,
    );

    if accept_invalid_certs {
        warn!("Building scoring client with TLS certificate validation disabled");
    }

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .gzip(true)
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()
        .map_err(|e| ScoringError::configuration(format!("Failed to build HTTP client: {}", e)))
}
