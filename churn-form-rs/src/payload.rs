//! Payload builder
//!
//! Coerces the raw text of a form submission into the typed row sent to the
//! scorer. Only the numeric kind of each field is enforced: range limits and
//! enumeration membership are left to the HTML controls, so out-of-range or
//! unknown values from a hand-crafted request are forwarded unchanged.

use std::collections::HashMap;

use log::debug;
use scoring_sdk::{ScoringPayload, ScoringValue};
use serde::Deserialize;
use thiserror::Error;

use crate::schema::{FieldKind, FieldSchema};

/// A malformed submission
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("missing field '{0}'")]
    MissingField(String),

    #[error("field '{field}' expects {expected}, got '{value}'")]
    InvalidNumber {
        field: String,
        value: String,
        expected: &'static str,
    },
}

/// Raw field values of one form submission, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SubmittedRecord(HashMap<String, String>);

impl SubmittedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys not described by `schema`
    pub fn unknown_fields<'a>(&'a self, schema: &'a FieldSchema) -> impl Iterator<Item = &'a str> {
        self.0.keys().map(String::as_str).filter(|k| !schema.contains(k))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SubmittedRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Build the scoring payload for `submitted`, in schema order
///
/// Keys that are not in the schema are ignored.
pub fn build_payload(
    schema: &FieldSchema,
    submitted: &SubmittedRecord,
) -> Result<ScoringPayload, SubmissionError> {
    let mut payload = ScoringPayload::with_capacity(schema.len());

    for field in schema.iter() {
        let raw = submitted
            .get(field.name)
            .ok_or_else(|| SubmissionError::MissingField(field.name.to_string()))?;

        let value = coerce(field.name, &field.kind, raw)?;
        payload.push(field.name, value);
    }

    for extra in submitted.unknown_fields(schema) {
        debug!("Ignoring unknown submitted field '{}'", extra);
    }

    Ok(payload)
}

fn coerce(name: &str, kind: &FieldKind, raw: &str) -> Result<ScoringValue, SubmissionError> {
    let invalid = || SubmissionError::InvalidNumber {
        field: name.to_string(),
        value: raw.to_string(),
        expected: kind.expected(),
    };

    match kind {
        FieldKind::Enumeration { .. } => Ok(ScoringValue::Text(raw.to_string())),
        FieldKind::BoundedInteger { .. } => raw
            .trim()
            .parse::<i64>()
            .map(ScoringValue::Integer)
            .map_err(|_| invalid()),
        FieldKind::BoundedFloat { .. } => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(ScoringValue::Float)
            .ok_or_else(invalid),
    }
}
