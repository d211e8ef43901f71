//! Core abstraction implemented by scoring clients

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ScoringPayload, ScoringResult};

/// Anything that can turn a feature payload into a scoring result
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Client name, used in logs
    fn name(&self) -> &str;

    /// Whether endpoint and token are present
    fn is_configured(&self) -> bool;

    /// Score one payload. A single attempt; errors are terminal for the caller.
    async fn score(&self, payload: &ScoringPayload) -> Result<ScoringResult>;
}
