//! Unit tests for the Scoring SDK
