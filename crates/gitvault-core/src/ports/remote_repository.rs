//! Remote repository port (driven/secondary port)
//!
//! This module defines the interface for the remote side of the sync:
//! listing the file tree of the configured branch and retrieving file
//! content. The primary implementation targets the GitHub REST API, but
//! the trait carries no GitHub-specific surface.
//!
//! ## Design Notes
//!
//! - Methods return the typed [`SyncError`] rather than `anyhow::Result`:
//!   the orchestrator needs the error category to build outcome entries,
//!   so classification must happen inside the adapter where the HTTP
//!   status is still known.
//! - `test_reachability` and `quota_status` are deliberately infallible;
//!   they exist for preflight checks and status displays, where a thrown
//!   error is strictly less useful than a negative answer.

use crate::domain::errors::SyncError;
use crate::domain::manifest::RemoteManifest;

/// Remote API quota snapshot
///
/// All-zero when the quota endpoint is unreachable; callers treat that
/// as "unknown", not as an exhausted quota.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuotaStatus {
    /// Requests allowed per window
    pub limit: u64,
    /// Requests remaining in the current window
    pub remaining: u64,
    /// Unix timestamp at which the window resets
    pub reset_epoch_seconds: u64,
}

/// Port trait for remote repository retrieval
///
/// All retry/fallback policy lives behind this interface; the engine
/// issues one logical call per need and never re-tries on its own.
#[async_trait::async_trait]
pub trait IRemoteRepository: Send + Sync {
    /// Lists the full recursive file tree of the configured branch.
    ///
    /// Non-file entries are filtered out before the manifest is returned.
    /// A truncated listing is reported via [`RemoteManifest::truncated`],
    /// not as an error.
    ///
    /// # Errors
    /// [`SyncError::Auth`], [`SyncError::NotFound`], [`SyncError::RateLimit`],
    /// [`SyncError::Network`], or [`SyncError::Malformed`].
    async fn list_files(&self) -> Result<RemoteManifest, SyncError>;

    /// Fetches the bytes of one file, applying the multi-tier fallback
    /// strategy for content the primary endpoint cannot serve.
    ///
    /// # Arguments
    /// * `path` - Repository-relative slash-separated path
    /// * `sha` - Blob SHA when known; enables the fingerprint-addressed
    ///   last-resort tier
    ///
    /// # Errors
    /// [`SyncError::NotFound`], [`SyncError::TooLargeExhausted`],
    /// [`SyncError::Network`], or [`SyncError::Auth`].
    async fn fetch_file_bytes(&self, path: &str, sha: Option<&str>) -> Result<Vec<u8>, SyncError>;

    /// Minimal authenticated probe against the repository metadata
    /// endpoint. Returns `false` on any failure; never errors.
    async fn test_reachability(&self) -> bool;

    /// Current API quota, defaulting to all-zero on failure.
    async fn quota_status(&self) -> QuotaStatus;
}
