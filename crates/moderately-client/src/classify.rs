//! Mapping of error responses to [`Error`] values.

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde_json::Value;

use crate::error::{Error, FieldError};

/// Body keys that may carry field-level validation details.
const FIELD_ERROR_KEYS: [&str; 3] = ["errors", "details", "detail"];

/// Classify a non-2xx response.
///
/// Pure: the same status, headers and body always produce the same error.
pub fn classify(status: u16, headers: &HeaderMap, body: &[u8]) -> Error {
    let raw = String::from_utf8_lossy(body).into_owned();
    let json: Option<Value> = serde_json::from_slice(body).ok();
    let message = extract_message(status, json.as_ref(), &raw);

    match status {
        401 | 403 => Error::Authentication {
            status,
            message,
            body: raw,
        },
        404 => Error::NotFound {
            status,
            message,
            body: raw,
        },
        409 => Error::Conflict {
            status,
            message,
            body: raw,
        },
        422 => Error::Validation {
            status,
            message,
            fields: json.as_ref().map(extract_field_errors).unwrap_or_default(),
            body: raw,
        },
        429 => Error::RateLimit {
            status,
            message,
            retry_after: parse_retry_after(headers, json.as_ref()),
            body: raw,
        },
        _ => Error::Api {
            status,
            message,
            body: raw,
        },
    }
}

/// Pick a human-readable message out of an error body.
fn extract_message(status: u16, json: Option<&Value>, raw: &str) -> String {
    if let Some(obj) = json.and_then(Value::as_object) {
        for key in ["message", "error", "detail"] {
            match obj.get(key) {
                Some(Value::String(s)) if !s.is_empty() => return s.clone(),
                Some(Value::Object(inner)) => {
                    if let Some(Value::String(s)) = inner.get("message") {
                        return s.clone();
                    }
                }
                _ => {}
            }
        }
    }

    let trimmed = raw.trim();
    if !trimmed.is_empty() && json.is_none() && trimmed.len() <= 200 {
        return trimmed.to_string();
    }

    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason());
    match reason {
        Some(reason) => format!("HTTP {} {}", status, reason),
        None => format!("HTTP {}", status),
    }
}

/// Extract field-level messages from a validation body.
///
/// Accepts the shapes the API has been seen to produce:
/// - `{"errors": [{"field": "name", "message": "..."}]}`
/// - `{"detail": [{"loc": ["body", "name"], "msg": "..."}]}`
/// - `{"errors": {"name": ["...", "..."]}}`
pub(crate) fn extract_field_errors(json: &Value) -> Vec<FieldError> {
    let Some(obj) = json.as_object() else {
        return Vec::new();
    };

    for key in FIELD_ERROR_KEYS {
        let fields = match obj.get(key) {
            Some(Value::Array(items)) => items.iter().filter_map(field_from_item).collect(),
            Some(Value::Object(map)) => map
                .iter()
                .flat_map(|(field, messages)| match messages {
                    Value::String(s) => vec![FieldError::new(field.clone(), s.clone())],
                    Value::Array(list) => list
                        .iter()
                        .filter_map(Value::as_str)
                        .map(|s| FieldError::new(field.clone(), s))
                        .collect(),
                    _ => Vec::new(),
                })
                .collect(),
            _ => Vec::new(),
        };
        if !fields.is_empty() {
            return fields;
        }
    }

    Vec::new()
}

fn field_from_item(item: &Value) -> Option<FieldError> {
    match item {
        Value::String(s) => Some(FieldError::new("", s.clone())),
        Value::Object(obj) => {
            let message = ["message", "msg"]
                .iter()
                .find_map(|k| obj.get(*k).and_then(Value::as_str))?;
            let field = ["field", "path", "property", "loc"]
                .iter()
                .find_map(|k| obj.get(*k))
                .map(field_path)
                .unwrap_or_default();
            Some(FieldError::new(field, message))
        }
        _ => None,
    }
}

fn field_path(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|p| match p {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("."),
        other => other.to_string(),
    }
}

/// Read the rate-limit wait hint from the `Retry-After` header, falling back
/// to a `retryAfter` / `retry_after` body field. Only delta-seconds are
/// understood; HTTP-date values are ignored.
fn parse_retry_after(headers: &HeaderMap, json: Option<&Value>) -> Option<Duration> {
    let from_header = headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_seconds);
    if from_header.is_some() {
        return from_header;
    }

    let obj = json?.as_object()?;
    ["retryAfter", "retry_after"]
        .iter()
        .find_map(|k| obj.get(*k))
        .and_then(|v| match v {
            Value::Number(n) => n.as_f64().and_then(seconds_to_duration),
            Value::String(s) => parse_seconds(s),
            _ => None,
        })
}

fn parse_seconds(value: &str) -> Option<Duration> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    value.parse::<f64>().ok().and_then(seconds_to_duration)
}

// Out-of-range hints are treated as absent so the computed backoff applies.
fn seconds_to_duration(secs: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(secs).ok()
}
