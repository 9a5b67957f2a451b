//! Client error types.

use ledger_query::DecodeError;
use serde::Deserialize;

/// Error code the service reports when a unique index constraint is violated.
pub const INSTANCE_NOT_UNIQUE: &str = "instance not unique";

/// Error code the service reports when a document or set is empty.
pub const INSTANCE_NOT_FOUND: &str = "instance not found";

/// One entry of the service's `errors` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceError {
    /// Error code, e.g. `"instance not unique"`.
    pub code: String,
    /// Human-readable description.
    pub description: String,
    /// Position of the failing sub-expression in the query.
    #[serde(default)]
    pub position: Vec<serde_json::Value>,
}

/// Error response body.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub errors: Vec<ServiceError>,
}

/// Errors that can occur when querying the database.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service rejected the query.
    #[error("service error: HTTP {status}: {}", summarize(.errors))]
    Service {
        /// HTTP status code.
        status: u16,
        /// Errors reported by the service.
        errors: Vec<ServiceError>,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The response could not be decoded into a value.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The response body had an unexpected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Whether the service reported a unique constraint violation.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        self.has_code(INSTANCE_NOT_UNIQUE)
    }

    /// Whether the service reported a missing document or empty set.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Service { status: 404, .. }) || self.has_code(INSTANCE_NOT_FOUND)
    }

    fn has_code(&self, code: &str) -> bool {
        match self {
            Self::Service { errors, .. } => errors.iter().any(|e| e.code == code),
            _ => false,
        }
    }
}

fn summarize(errors: &[ServiceError]) -> String {
    if errors.is_empty() {
        return "no error details".to_string();
    }
    errors
        .iter()
        .map(|e| format!("{} ({})", e.code, e.description))
        .collect::<Vec<_>>()
        .join("; ")
}
