//! Sync run outcome
//!
//! [`SyncOutcome`] is the sole return contract of a sync run. Callers must
//! not assume side effects occurred merely because `success` is true —
//! the counts and the error list carry the actual result.

use serde::{Deserialize, Serialize};

use super::errors::SyncError;

/// Category under which an outcome error entry is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Transport or quota failure
    Network,
    /// Credential rejected
    Auth,
    /// Per-file fetch/write/delete failure
    File,
    /// Anything else
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::File => "file",
            ErrorCategory::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// One error recorded during a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncErrorEntry {
    /// Path of the affected file; `None` for run-level errors
    pub path: Option<String>,
    /// Human-readable message
    pub message: String,
    /// Reporting category
    pub category: ErrorCategory,
}

impl SyncErrorEntry {
    /// Builds a per-file entry; per-file apply errors are always
    /// reported under the `file` category.
    pub fn for_file(path: impl Into<String>, err: &SyncError) -> Self {
        Self {
            path: Some(path.into()),
            message: err.to_string(),
            category: ErrorCategory::File,
        }
    }

    /// Builds a run-level entry classified by the error itself
    pub fn run_level(err: &SyncError) -> Self {
        Self {
            path: None,
            message: err.to_string(),
            category: err.category(),
        }
    }
}

/// Summary of a completed (or rejected) sync run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// False when the manifest fetch failed, configuration was missing,
    /// the run was rejected as already-running, or the state persist
    /// failed. Per-file errors do not flip this flag.
    pub success: bool,
    /// Number of files newly created locally
    pub files_added: u32,
    /// Number of files overwritten with changed content
    pub files_modified: u32,
    /// Number of files actually deleted from local storage
    pub files_deleted: u32,
    /// Ordered list of errors encountered
    pub errors: Vec<SyncErrorEntry>,
}

impl SyncOutcome {
    /// Successful outcome with all counts zero
    pub fn empty_success() -> Self {
        Self {
            success: true,
            files_added: 0,
            files_modified: 0,
            files_deleted: 0,
            errors: Vec::new(),
        }
    }

    /// Failed outcome whose sole error entry is derived from `err`
    pub fn failure(err: &SyncError) -> Self {
        Self {
            success: false,
            files_added: 0,
            files_modified: 0,
            files_deleted: 0,
            errors: vec![SyncErrorEntry::run_level(err)],
        }
    }

    /// Total number of files changed locally by the run
    pub fn files_changed(&self) -> u32 {
        self.files_added + self.files_modified + self.files_deleted
    }
}
