//! Error types for decoding service responses.

/// Errors that can occur when decoding a response value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// A field expected at the given path is absent.
    #[error("missing field: {path}")]
    MissingField {
        /// Dotted path of the missing field.
        path: String,
    },

    /// A value has a different type than expected.
    #[error("unexpected type at {path}: expected {expected}, found {found}")]
    UnexpectedType {
        /// Dotted path of the value.
        path: String,
        /// Expected type name.
        expected: &'static str,
        /// Actual type name.
        found: &'static str,
    },

    /// A tagged wire value (`@ref`, `@ts`, ...) has an invalid payload.
    #[error("malformed {tag} value: {reason}")]
    MalformedTag {
        /// The tag name.
        tag: String,
        /// What was wrong with the payload.
        reason: String,
    },
}
