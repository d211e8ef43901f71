//! # Scoring SDK
//!
//! Client for remote machine-learning scoring endpoints that accept an
//! `input_data` feature payload and answer with `predictions`.
//!
//! This crate provides:
//!
//! - Wire models for the scoring request and response envelopes
//! - A `Scorer` trait used by callers that only need to score a payload
//! - A reqwest-backed `ScoringClient` with bearer authorization
//! - An error taxonomy separating configuration, transport and response problems
//!
//! A scoring call is a single attempt. There is no retry, caching or circuit
//! breaking; the only guard is the request timeout in `ScoringConfig`.

pub mod core;
pub use core::Scorer;

pub mod services;
pub use services::scoring::{ScoringClient, ScoringClientBuilder};

pub mod models;
pub use models::{ScoringPayload, ScoringResult, ScoringValue};

pub mod error;
pub use error::{Result, ScoringError};

pub mod config;
pub use config::ScoringConfig;

mod util;

#[cfg(test)]
mod tests;
