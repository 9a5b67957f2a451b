//! Demo error types.

use ledger_client::ClientError;
use ledger_query::DecodeError;

/// Result type for demo steps.
pub type Result<T> = std::result::Result<T, DemoError>;

/// Errors that end a demo run.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// A request to the database failed.
    #[error("{step} failed: {source}")]
    Step {
        /// The step that issued the request.
        step: &'static str,
        /// The client error.
        #[source]
        source: ClientError,
    },

    /// A request succeeded but its result had an unexpected shape.
    #[error("{step} returned an unexpected value: {source}")]
    Decode {
        /// The step that issued the request.
        step: &'static str,
        /// The decode error.
        #[source]
        source: DecodeError,
    },
}

impl DemoError {
    /// Adapter for `map_err` tagging a client error with its step.
    pub(crate) fn step(step: &'static str) -> impl FnOnce(ClientError) -> Self {
        move |source| Self::Step { step, source }
    }

    /// Adapter for `map_err` tagging a decode error with its step.
    pub(crate) fn decode(step: &'static str) -> impl FnOnce(DecodeError) -> Self {
        move |source| Self::Decode { step, source }
    }

    /// The client error behind this failure, if any.
    #[must_use]
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Step { source, .. } => Some(source),
            Self::Decode { .. } => None,
        }
    }
}
