//! HTTP scoring client
//!
//! Posts a `ScoringPayload` to the configured endpoint with bearer
//! authorization and parses the first prediction of the reply.

use std::time::Instant;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{header, Client, Response};

use crate::config::ScoringConfig;
use crate::core::Scorer;
use crate::error::{mapping, Result, ScoringError};
use crate::models::{ScoringPayload, ScoringResponse, ScoringResult};
use crate::services::common::{build_http_client, UserAgent};
use crate::util::{sanitize_for_logging, truncate_string};

/// Longest slice of a scorer reply written to the debug log
const MAX_LOGGED_BODY: usize = 2048;

/// Largest scorer reply read into memory
pub(crate) const MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// Reqwest-backed scoring client
#[derive(Clone)]
pub struct ScoringClient {
    http_client: Client,
    config: ScoringConfig,
}

impl std::fmt::Debug for ScoringClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringClient").field("config", &self.config).finish()
    }
}

impl ScoringClient {
    /// Create a client. Missing endpoint or token is allowed here and reported by `score`.
    pub fn new(config: ScoringConfig) -> Result<Self> {
        let http_client = build_http_client(
            Some(UserAgent::default()),
            config.timeout(),
            config.accept_invalid_certs,
        )?;

        Ok(Self { http_client, config })
    }

    pub fn builder() -> ScoringClientBuilder {
        ScoringClientBuilder::default()
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Send one scoring request
    ///
    /// Configuration is checked before anything touches the network.
    pub async fn score(&self, payload: &ScoringPayload) -> Result<ScoringResult> {
        let (endpoint, token) = self.config.credentials()?;

        let request = payload.to_request();
        debug!("Payload is: {}", serde_json::to_string(&request)?);

        let start_time = Instant::now();
        let response = self
            .http_client
            .post(endpoint)
            .bearer_auth(token)
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = read_body(response).await?;
        debug!(
            "Scorer replied {} in {:.2}ms",
            status,
            start_time.elapsed().as_secs_f64() * 1000.0
        );

        if !status.is_success() {
            let error = mapping::map_http_error(status, &body);
            warn!(
                "Scoring request failed ({}): {}",
                mapping::classify_http_error(status),
                sanitize_for_logging(&error.to_string())
            );
            return Err(error);
        }

        debug!(
            "Result is {}",
            sanitize_for_logging(&truncate_string(&body, MAX_LOGGED_BODY))
        );

        let parsed: ScoringResponse = serde_json::from_str(&body)?;
        parsed.into_result()
    }
}

/// Read the reply body, failing once it grows past `MAX_RESPONSE_BYTES`
async fn read_body(mut response: Response) -> Result<String> {
    let too_large = || {
        ScoringError::response_format(format!(
            "reply exceeds the {} byte limit",
            MAX_RESPONSE_BYTES
        ))
    };

    if response
        .content_length()
        .map_or(false, |len| len > MAX_RESPONSE_BYTES as u64)
    {
        return Err(too_large());
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > MAX_RESPONSE_BYTES {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}

#[async_trait]
impl Scorer for ScoringClient {
    fn name(&self) -> &str {
        "scoring-endpoint"
    }

    fn is_configured(&self) -> bool {
        self.config.is_complete()
    }

    async fn score(&self, payload: &ScoringPayload) -> Result<ScoringResult> {
        ScoringClient::score(self, payload).await
    }
}

/// Builder for `ScoringClient`
#[derive(Default)]
pub struct ScoringClientBuilder {
    endpoint: Option<String>,
    token: Option<String>,
    timeout_seconds: Option<u64>,
    accept_invalid_certs: bool,
}

impl ScoringClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scoring endpoint URL
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the timeout in seconds
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Disable TLS certificate validation. Only for test environments with self-signed scorers.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn build(self) -> Result<ScoringClient> {
        let mut config = ScoringConfig::new(self.endpoint, self.token);
        if let Some(timeout) = self.timeout_seconds {
            config.timeout_seconds = timeout;
        }
        config.accept_invalid_certs = self.accept_invalid_certs;

        // A complete config must also be a usable one.
        if config.is_complete() {
            config.validate()?;
        }

        ScoringClient::new(config)
    }
}
