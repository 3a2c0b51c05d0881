//! Content negotiation for response bodies.
//!
//! Bodies are read into a [`serde_json::Value`] first: JSON bodies are
//! parsed, anything else becomes a JSON string. Success payloads are then
//! decoded into the caller's type and error payloads are searched for a
//! message.

use reqwest::header::{CONTENT_TYPE, HeaderMap};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::RequestError;

/// How a response body is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// `application/json` (including `+json` suffixes and charset params).
    Json,
    /// Everything else, read as UTF-8 text.
    Text,
}

impl BodyFormat {
    /// Picks the format from a response's `Content-Type` header.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        Self::from_content_type(content_type)
    }

    /// Picks the format from a raw `Content-Type` value.
    pub fn from_content_type(content_type: &str) -> Self {
        let essence = content_type.to_ascii_lowercase();
        if essence.contains("application/json") || essence.contains("+json") {
            Self::Json
        } else {
            Self::Text
        }
    }

    /// Reads a body into a JSON value.
    ///
    /// Empty bodies become `null` in both formats so that `()` and `Option`
    /// payloads decode from `204 No Content` responses.
    ///
    /// ## Errors
    ///
    /// Returns [`RequestError::Decode`] with status `0` if a JSON body is
    /// malformed; an unreadable body counts as no usable response.
    pub fn parse(self, body: &[u8]) -> Result<Value, RequestError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        match self {
            Self::Json => serde_json::from_slice(body).map_err(|e| RequestError::Decode {
                status: 0,
                message: format!("invalid JSON response: {e}"),
            }),
            Self::Text => Ok(Value::String(String::from_utf8_lossy(body).into_owned())),
        }
    }
}

/// Decodes a parsed success body into the caller's payload type.
///
/// A mismatch keeps the status the body arrived with.
pub(crate) fn decode<T: DeserializeOwned>(body: Value, status: u16) -> Result<T, RequestError> {
    serde_json::from_value(body).map_err(|e| RequestError::Decode {
        status,
        message: format!("unexpected response shape: {e}"),
    })
}

/// Extracts the message for a non-success response.
///
/// Prefers a string `message` field, then the raw body, then `HTTP <status>`.
pub(crate) fn error_message(body: &Value, status: u16) -> String {
    match body {
        Value::Object(fields) => match fields.get("message") {
            Some(Value::String(message)) if !message.is_empty() => message.clone(),
            _ => body.to_string(),
        },
        Value::String(text) if !text.trim().is_empty() => text.clone(),
        Value::Null | Value::String(_) | Value::Bool(false) => format!("HTTP {status}"),
        Value::Number(n) if n.as_f64() == Some(0.0) => format!("HTTP {status}"),
        other => other.to_string(),
    }
}
