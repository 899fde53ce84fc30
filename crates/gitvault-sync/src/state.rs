//! Durable sync state persistence
//!
//! The [`SyncStateStore`] owns the persisted
//! [`SyncStateDocument`](gitvault_core::domain::SyncStateDocument): it
//! loads the snapshot at the start of a run and writes the whole mutated
//! document back at the end. Persistence goes through the
//! [`ILocalStore`] port, so the document lives inside the vault
//! alongside the synced content.

use std::sync::Arc;

use tracing::{debug, warn};

use gitvault_core::domain::errors::SyncError;
use gitvault_core::domain::state::SyncStateDocument;
use gitvault_core::ports::local_store::ILocalStore;

/// Loads and persists the sync state document at a fixed vault path
pub struct SyncStateStore {
    /// Storage the document is read from and written to
    store: Arc<dyn ILocalStore>,
    /// Vault-relative path of the document
    state_path: String,
}

impl SyncStateStore {
    /// Creates a store persisting at `state_path`
    pub fn new(store: Arc<dyn ILocalStore>, state_path: impl Into<String>) -> Self {
        Self {
            store,
            state_path: state_path.into(),
        }
    }

    /// Vault-relative path of the persisted document
    pub fn state_path(&self) -> &str {
        &self.state_path
    }

    /// Loads the persisted document.
    ///
    /// Any read or parse failure yields a fresh empty document:
    /// corruption and first-run are indistinguishable and both recover
    /// silently (the next sync simply re-downloads everything).
    pub async fn load(&self) -> SyncStateDocument {
        let raw = match self.store.read(&self.state_path).await {
            Ok(raw) => raw,
            Err(err) => {
                debug!(path = %self.state_path, %err, "no readable sync state, starting fresh");
                return SyncStateDocument::new();
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(doc) => doc,
            Err(err) => {
                warn!(path = %self.state_path, %err, "sync state unparseable, starting fresh");
                SyncStateDocument::new()
            }
        }
    }

    /// Persists the full document.
    ///
    /// The write goes through the storage adapter's (atomic) write
    /// primitive; failures propagate so the caller can decide whether
    /// they are fatal to the run.
    pub async fn persist(&self, document: &SyncStateDocument) -> Result<(), SyncError> {
        let raw = serde_json::to_vec_pretty(document)
            .map_err(|e| SyncError::StorageFailure(format!("serializing sync state: {e}")))?;

        self.store
            .write(&self.state_path, &raw)
            .await
            .map_err(|e| SyncError::StorageFailure(format!("writing sync state: {e:#}")))?;

        debug!(
            path = %self.state_path,
            files = document.files.len(),
            "sync state persisted"
        );
        Ok(())
    }
}
