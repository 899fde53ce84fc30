//! Sync orchestrator
//!
//! The [`SyncEngine`] runs the end-to-end reconciliation state machine:
//!
//! 1. Fetch the remote manifest (any failure aborts the run)
//! 2. Load the persisted state document
//! 3. Diff manifest against state
//! 4. Apply changes in fixed-size concurrent batches; each file is an
//!    isolated failure domain whose errors are aggregated, never fatal
//! 5. Persist the updated state, even after per-file errors, so
//!    succeeded files are not re-downloaded next run
//!
//! ## Single-flight
//!
//! At most one run executes at a time: an atomic flag is claimed before
//! the first suspension point and released by an RAII guard on every
//! exit path, so a failed run can never wedge future syncs. A rejected
//! second `run()` returns immediately with an already-running outcome
//! and touches neither state nor network.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use futures_util::future::join_all;
use tracing::{debug, error, info, warn};

use gitvault_core::config::{Config, RepositoryConfig};
use gitvault_core::domain::errors::SyncError;
use gitvault_core::domain::outcome::{SyncErrorEntry, SyncOutcome};
use gitvault_core::domain::state::{ChangeKind, FileChangeIntent};
use gitvault_core::ports::local_store::ILocalStore;
use gitvault_core::ports::notification::{INotifier, Notification};
use gitvault_core::ports::remote_repository::IRemoteRepository;

use crate::state::SyncStateStore;

/// Progress indicator id used for batch progress reporting
const PROGRESS_ID: &str = "gitvault-sync";

/// Result of one per-file apply
enum Applied {
    /// Content was fetched and written
    Written,
    /// The path was deleted; `existed` is whether a file was really there
    Removed { existed: bool },
}

/// Releases the single-flight flag when the run ends, however it ends
struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// One-way sync orchestrator
///
/// ## Dependencies
///
/// - `remote`: manifest listing and file retrieval
/// - `store`: local vault writes/deletes
/// - `notifier`: user-facing status (fire-and-forget)
/// - `state_store`: the persisted path→SHA snapshot
pub struct SyncEngine {
    /// Remote repository operations
    remote: Arc<dyn IRemoteRepository>,
    /// Local vault storage
    store: Arc<dyn ILocalStore>,
    /// User-facing status surface
    notifier: Arc<dyn INotifier>,
    /// Persisted state document store
    state_store: SyncStateStore,
    /// Repository settings, validated at the start of every run
    repository: RepositoryConfig,
    /// Per-file applies that run concurrently within a batch
    batch_size: usize,
    /// Changed-file count above which batch progress is reported
    progress_threshold: usize,
    /// Single-flight guard flag
    is_syncing: AtomicBool,
}

impl SyncEngine {
    /// Creates a new `SyncEngine` with the given dependencies
    pub fn new(
        remote: Arc<dyn IRemoteRepository>,
        store: Arc<dyn ILocalStore>,
        notifier: Arc<dyn INotifier>,
        config: &Config,
    ) -> Self {
        let state_store = SyncStateStore::new(store.clone(), config.sync.state_path.clone());
        Self {
            remote,
            store,
            notifier,
            state_store,
            repository: config.repository.clone(),
            batch_size: config.sync.batch_size.max(1),
            progress_threshold: config.sync.progress_threshold,
            is_syncing: AtomicBool::new(false),
        }
    }

    /// Returns whether a run is currently in flight
    pub fn is_syncing(&self) -> bool {
        self.is_syncing.load(Ordering::SeqCst)
    }

    /// Runs one full sync and returns its outcome.
    ///
    /// The outcome is the sole return contract: `success` is false only
    /// for configuration, single-flight, manifest-fetch, or state-persist
    /// failures; per-file errors are aggregated in `errors` without
    /// flipping the flag.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> SyncOutcome {
        // Claim the flag before the first suspension point.
        if self
            .is_syncing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("sync rejected: already in progress");
            return SyncOutcome::failure(&SyncError::AlreadyRunning);
        }
        let _guard = FlightGuard {
            flag: &self.is_syncing,
        };

        if let Err(err) = self.repository.validate() {
            debug!(%err, "sync rejected: not configured");
            return SyncOutcome::failure(&err);
        }

        let start = std::time::Instant::now();
        info!(repo = %self.repository.repo, "starting sync");
        self.notify(Notification::sync("Sync", "Sync started")).await;

        // Step 1: remote manifest. Any failure here aborts the whole run.
        let manifest = match self.remote.list_files().await {
            Ok(manifest) => manifest,
            Err(err) => {
                error!(%err, "manifest fetch failed, aborting run");
                self.notify(Notification::error("Sync failed", err.to_string()))
                    .await;
                return SyncOutcome::failure(&err);
            }
        };

        if manifest.truncated {
            warn!("remote listing truncated; syncing the partial list");
            self.notify(Notification::sync(
                "Sync",
                "Remote listing was truncated; some files may be skipped",
            ))
            .await;
        }

        // Steps 2-3: load state, diff.
        let mut state = self.state_store.load().await;
        let changes = state.diff(&manifest.entries);

        if changes.is_empty() {
            info!("already up to date");
            return SyncOutcome::empty_success();
        }

        info!(
            changes = changes.len(),
            remote_files = manifest.entries.len(),
            "applying change set"
        );

        // Steps 4-5: batched apply. Within a batch all applies run
        // concurrently; batches run sequentially. Results are folded
        // into the state document serially after each batch.
        let mut outcome = SyncOutcome::empty_success();
        let total = changes.len();
        let report_progress = total > self.progress_threshold;
        let mut processed = 0usize;

        for batch in changes.chunks(self.batch_size) {
            let results = join_all(batch.iter().map(|intent| self.apply_change(intent))).await;

            for (intent, result) in batch.iter().zip(results) {
                match result {
                    Ok(Applied::Written) => {
                        let sha = intent.sha.as_deref().unwrap_or_default();
                        state.record_applied(&intent.path, sha, Utc::now().timestamp_millis());
                        match intent.kind {
                            ChangeKind::Added => outcome.files_added += 1,
                            ChangeKind::Modified => outcome.files_modified += 1,
                            ChangeKind::Deleted => {}
                        }
                    }
                    Ok(Applied::Removed { existed }) => {
                        // State cleanup happens whether or not the file
                        // was still present; only real deletions count.
                        state.record_removed(&intent.path);
                        if existed {
                            outcome.files_deleted += 1;
                        }
                    }
                    Err(err) => {
                        warn!(path = %intent.path, %err, "file apply failed");
                        outcome
                            .errors
                            .push(SyncErrorEntry::for_file(&intent.path, &err));
                    }
                }
            }

            processed += batch.len();
            if report_progress {
                let percent = (processed as f64 / total as f64) * 100.0;
                if let Err(err) = self
                    .notifier
                    .show_progress(PROGRESS_ID, "Syncing vault", percent)
                    .await
                {
                    debug!(%err, "progress update dropped");
                }
            }
        }

        if report_progress {
            self.notifier.clear_progress(PROGRESS_ID).await.ok();
        }

        // Step 6: persist state, even after per-file errors; succeeded
        // files must not be re-downloaded next run.
        state.stamp(Utc::now().timestamp_millis(), manifest.reference_id.clone());
        if let Err(err) = self.state_store.persist(&state).await {
            error!(%err, "failed to persist sync state");
            outcome.success = false;
            outcome.errors.push(SyncErrorEntry::run_level(&err));
        }

        info!(
            added = outcome.files_added,
            modified = outcome.files_modified,
            deleted = outcome.files_deleted,
            errors = outcome.errors.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "sync completed"
        );

        self.notify(Notification::sync(
            "Sync complete",
            format!(
                "{} added, {} modified, {} deleted{}",
                outcome.files_added,
                outcome.files_modified,
                outcome.files_deleted,
                if outcome.errors.is_empty() {
                    String::new()
                } else {
                    format!(" ({} errors)", outcome.errors.len())
                }
            ),
        ))
        .await;

        outcome
    }

    /// Applies a single change intent.
    ///
    /// This is the isolated failure domain: any error is returned to the
    /// batch loop for aggregation and never aborts the run.
    async fn apply_change(&self, intent: &FileChangeIntent) -> Result<Applied, SyncError> {
        match intent.kind {
            ChangeKind::Deleted => {
                let existed = self
                    .store
                    .delete(&intent.path)
                    .await
                    .map_err(SyncError::storage)?;
                debug!(path = %intent.path, existed, "deleted");
                Ok(Applied::Removed { existed })
            }
            ChangeKind::Added | ChangeKind::Modified => {
                let bytes = self
                    .remote
                    .fetch_file_bytes(&intent.path, intent.sha.as_deref())
                    .await?;

                self.store
                    .write(&intent.path, &bytes)
                    .await
                    .map_err(SyncError::storage)?;

                debug!(path = %intent.path, bytes = bytes.len(), kind = ?intent.kind, "written");
                Ok(Applied::Written)
            }
        }
    }

    /// Fire-and-forget notification
    async fn notify(&self, notification: Notification) {
        if let Err(err) = self.notifier.notify(&notification).await {
            debug!(%err, "notification dropped");
        }
    }
}
