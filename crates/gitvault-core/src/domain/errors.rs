//! The sync error taxonomy
//!
//! Every failure a sync run can produce is one of these tagged variants.
//! The orchestrator folds them into [`SyncOutcome`](super::outcome::SyncOutcome)
//! entries via [`SyncError::category`]; nothing crosses the engine boundary
//! as an untyped error.

use thiserror::Error;

use super::outcome::ErrorCategory;

/// Errors produced by the sync engine and the remote repository adapter
#[derive(Debug, Error)]
pub enum SyncError {
    /// Repository identity or credential is missing; no network was attempted
    #[error("Sync is not configured: {0}")]
    ConfigurationMissing(String),

    /// Transport-level failure (DNS, connect, timeout, unexpected status)
    #[error("Network error: {0}")]
    Network(String),

    /// Credential rejected or insufficient scope
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// API quota exhausted; the message must surface the reset time
    #[error("Rate limit exceeded (resets at epoch {reset_epoch_seconds}): {message}")]
    RateLimit {
        /// Human-readable detail from the provider
        message: String,
        /// Unix timestamp at which the quota window resets
        reset_epoch_seconds: u64,
    },

    /// Repository, branch, or file absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// All content retrieval tiers failed for a file
    #[error("Unable to retrieve '{path}': all retrieval tiers failed ({detail})")]
    TooLargeExhausted {
        /// Repository-relative path of the file
        path: String,
        /// Per-tier failure summary
        detail: String,
    },

    /// Unexpected payload shape from the provider
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Local read/write/delete failure
    #[error("Storage failure: {0}")]
    StorageFailure(String),

    /// A sync run was requested while another is in flight
    #[error("A sync is already in progress")]
    AlreadyRunning,
}

impl SyncError {
    /// Maps the error onto the outcome category it is reported under.
    ///
    /// Per-file apply errors are always recorded as [`ErrorCategory::File`]
    /// by the orchestrator regardless of this mapping; this classification
    /// applies to top-level (manifest/configuration/persist) errors.
    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::Network(_) | SyncError::RateLimit { .. } => ErrorCategory::Network,
            SyncError::Auth(_) => ErrorCategory::Auth,
            SyncError::StorageFailure(_) | SyncError::TooLargeExhausted { .. } => {
                ErrorCategory::File
            }
            _ => ErrorCategory::Unknown,
        }
    }

    /// Wraps an adapter-level storage error
    pub fn storage(err: impl std::fmt::Display) -> Self {
        SyncError::StorageFailure(err.to_string())
    }
}
