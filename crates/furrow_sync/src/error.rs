//! Sync error taxonomy.

use furrow_record::RecordError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors reported by the remote farm service boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The request never completed.
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a failure status.
    #[error("server rejected request ({status}): {message}")]
    Rejected {
        /// HTTP-style status code.
        status: u16,
        /// Server-provided reason.
        message: String,
    },
    /// The response arrived but could not be understood.
    #[error("malformed server response: {0}")]
    BadResponse(String),
}

impl ServiceError {
    /// True when retrying the same request later could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Rejected { status, .. } => *status >= 500,
            Self::BadResponse(_) => false,
        }
    }
}

/// Errors surfaced by the sync pipelines.
///
/// Transport failures keep the affected record indices so callers can
/// offer a user-visible retry. Normalization failures propagate as
/// [`RecordError`] and are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// A pull round failed before its records could be applied.
    #[error("pull failed: {source}")]
    Pull {
        /// The underlying service failure.
        #[source]
        source: ServiceError,
    },
    /// One or more outbound sends failed.
    #[error("push failed for {} record(s)", indices.len())]
    Push {
        /// Store indices whose send did not settle.
        indices: Vec<usize>,
        /// The first underlying service failure.
        #[source]
        source: ServiceError,
    },
    /// A caller-supplied store index does not exist.
    #[error("no record at store index {index}")]
    UnknownIndex {
        /// The offending index.
        index: usize,
    },
    /// A record failed normalization.
    #[error(transparent)]
    Record(#[from] RecordError),
}

impl SyncError {
    /// True when retrying the operation later could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Pull { source } | Self::Push { source, .. } => source.is_retryable(),
            Self::UnknownIndex { .. } | Self::Record(_) => false,
        }
    }
}
