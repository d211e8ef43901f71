//! Scoring service clients

pub mod common;
pub mod scoring;
