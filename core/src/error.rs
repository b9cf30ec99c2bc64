//! Error types for the dashboard API client.
//!
//! # Design
//! Every failure a caller can observe from an API operation is an
//! `ApiError`: a display message plus an optional list of per-field
//! validation messages. Backend error bodies are accepted as-is when they
//! already have that shape (see `is_api_error`); anything else, including
//! transport failures and undecodable bodies, is synthesized into one.
//! Callers therefore branch on a single shape, never on where the failure
//! came from.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single invalid field reported by a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Normalized, user-displayable failure returned by every API operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }

    pub fn with_errors(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            message: message.into(),
            errors: Some(errors),
        }
    }

    /// Fallback for a non-success response whose body is not an error payload.
    pub fn from_status(status: u16) -> Self {
        Self::new(format!("Request failed with status code {status}"))
    }

    /// No response was obtained at all.
    pub fn from_transport(err: &TransportError) -> Self {
        Self::new(format!("Network error: {err}"))
    }

    /// A success response whose body does not match the expected type.
    pub fn from_decode(err: &serde_json::Error) -> Self {
        Self::new(format!("Failed to decode response: {err}"))
    }

    /// The request payload could not be serialized to JSON.
    pub fn from_encode(err: &serde_json::Error) -> Self {
        Self::new(format!("Failed to encode request body: {err}"))
    }

    /// Narrow an arbitrary JSON value to an `ApiError`.
    ///
    /// Returns `Some` exactly when `is_api_error(value)` holds. Keys other
    /// than `message` and `errors` are not carried over.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !is_api_error(value) {
            return None;
        }
        let message = value.get("message")?.as_str()?.to_string();
        let errors = match value.get("errors") {
            Some(Value::Array(entries)) => Some(
                entries
                    .iter()
                    .filter_map(|entry| {
                        Some(FieldError {
                            field: entry.get("field")?.as_str()?.to_string(),
                            message: entry.get("message")?.as_str()?.to_string(),
                        })
                    })
                    .collect(),
            ),
            _ => None,
        };
        Some(Self { message, errors })
    }

    /// True when the backend reported at least one invalid field.
    pub fn is_validation(&self) -> bool {
        !self.field_errors().is_empty()
    }

    pub fn field_errors(&self) -> &[FieldError] {
        self.errors.as_deref().unwrap_or_default()
    }

    /// First message reported for `field`, if any.
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors()
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

/// A JSON value that does not have the API error shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("value is not an API error payload")]
pub struct NotAnApiError;

impl TryFrom<&Value> for ApiError {
    type Error = NotAnApiError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or(NotAnApiError)
    }
}

/// Structural check for a well-formed API error payload.
///
/// A value qualifies when it is an object with a string `message` and, if
/// an `errors` key is present, that key holds an array whose every element
/// is an object with string `field` and string `message`.
pub fn is_api_error(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    if !object.get("message").is_some_and(Value::is_string) {
        return false;
    }
    match object.get("errors") {
        None => true,
        Some(Value::Array(entries)) => entries.iter().all(is_field_error),
        Some(_) => false,
    }
}

fn is_field_error(value: &Value) -> bool {
    value.as_object().is_some_and(|entry| {
        entry.get("field").is_some_and(Value::is_string)
            && entry.get("message").is_some_and(Value::is_string)
    })
}

/// Failure to obtain any HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

/// Errors raised while constructing an `ApiClient` from configuration.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("failed to build HTTP transport: {0}")]
    Transport(#[from] reqwest::Error),
}
