//! Mapping of non-success scorer replies to `ScoringError`

use reqwest::StatusCode;
use serde_json::Value;

use super::ScoringError;
use crate::util::truncate_string;

/// Longest slice of a raw body quoted in an error message
const MAX_BODY_IN_MESSAGE: usize = 200;

/// Map a non-success HTTP reply to an `Upstream` error
pub fn map_http_error(status: StatusCode, body: &str) -> ScoringError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| extract_error_message(&json))
        .unwrap_or_else(|| fallback_message(status, body));

    ScoringError::upstream(status.as_u16(), message)
}

/// Pull a human readable message out of the common JSON error shapes:
/// `{"errors":[{"message":..}]}`, `{"error":{"message":..}}`, `{"error":".."}`, `{"message":".."}`
pub fn extract_error_message(json: &Value) -> Option<String> {
    if let Some(first) = json.get("errors").and_then(|e| e.as_array()).and_then(|e| e.first()) {
        if let Some(message) = first.get("message").and_then(|m| m.as_str()) {
            return Some(message.to_string());
        }
    }

    match json.get("error") {
        Some(Value::String(message)) => return Some(message.clone()),
        Some(error) => {
            if let Some(message) = error.get("message").and_then(|m| m.as_str()) {
                return Some(message.to_string());
            }
        }
        None => {}
    }

    json.get("message")
        .and_then(|m| m.as_str())
        .map(|m| m.to_string())
}

fn fallback_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, truncate_string(body, MAX_BODY_IN_MESSAGE))
    }
}

/// Category of an HTTP failure status
pub fn classify_http_error(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "validation",
        401 => "authentication",
        403 => "authorization",
        404 => "not_found",
        408 => "timeout",
        429 => "rate_limit",
        500..=599 => "server",
        _ => "unknown",
    }
}
