//! Record construction and transcoding errors.

use thiserror::Error;

/// Result type for record construction and transcoding.
pub type RecordResult<T> = Result<T, RecordError>;

/// Errors raised while normalizing or converting log records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A field value could not be coerced into its canonical shape.
    ///
    /// This is a data error on the producing side, not a transport
    /// failure; callers should surface it rather than retry.
    #[error("malformed input for `{field}`: {message}")]
    MalformedInput {
        /// The record field that failed normalization.
        field: &'static str,
        /// What was wrong with the value.
        message: String,
    },
}

impl RecordError {
    /// Creates a malformed-input error for the given field.
    pub fn malformed(field: &'static str, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            field,
            message: message.into(),
        }
    }

    /// The field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MalformedInput { field, .. } => field,
        }
    }
}
