//! Persisted sync state and the diff algorithm
//!
//! [`SyncStateDocument`] is the durable record of what was last synced:
//! one [`LocalFileRecord`] per path this engine has itself written. The
//! document is loaded at the start of a run, mutated in memory as changes
//! are applied, and persisted atomically at the end.
//!
//! The diff is a full O(n) set comparison by SHA equality, not a content
//! diff: a path present remotely but not in the document is `Added`, a
//! tracked path with a differing SHA is `Modified`, a tracked path absent
//! remotely is `Deleted`. Paths the document does not track are invisible
//! to the engine, which is what keeps local-only files untouched.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::manifest::RemoteFileEntry;

/// Classification of a single path in the diff output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Present remotely, not tracked locally
    Added,
    /// Tracked locally with a different content SHA
    Modified,
    /// Tracked locally, absent from the remote manifest
    Deleted,
}

/// Ephemeral diff output, consumed by the apply step and never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChangeIntent {
    /// Repository-relative path
    pub path: String,
    /// Target content SHA; `None` for deletions
    pub sha: Option<String>,
    /// What the apply step should do
    pub kind: ChangeKind,
}

/// One entry in persisted state
///
/// Created when a file is first synced, updated on every re-sync of that
/// path, removed when the remote deletes the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFileRecord {
    /// Repository-relative path (duplicated in the map key for the
    /// benefit of the persisted layout)
    pub path: String,
    /// Content SHA at last successful sync
    pub sha: String,
    /// Local timestamp of the last write, epoch milliseconds
    #[serde(rename = "lastModified")]
    pub last_modified: i64,
}

/// The full persisted snapshot
///
/// Invariant: every key in `files` corresponds to a path that was, at
/// some point, successfully written to local storage by this engine. The
/// map never includes paths the engine did not itself create or modify.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncStateDocument {
    /// Completion time of the last successful run, epoch milliseconds
    #[serde(rename = "lastSyncTimestamp")]
    pub last_sync_timestamp: i64,
    /// Identifier of the last synced tree; informational only
    #[serde(rename = "lastSyncReferenceId", default)]
    pub last_sync_reference_id: Option<String>,
    /// Tracked files by path (sorted map: deleted-diff order is map order)
    #[serde(default)]
    pub files: BTreeMap<String, LocalFileRecord>,
}

impl SyncStateDocument {
    /// Fresh empty document (first run and corruption recovery are
    /// indistinguishable and both start here)
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the engine has ever synced `path`
    pub fn is_tracked(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Computes the change set between this document and a fresh remote
    /// manifest.
    ///
    /// Added and modified intents follow the remote listing order;
    /// deleted intents follow the stored-map order. Entries whose SHA
    /// matches the tracked record produce nothing.
    pub fn diff(&self, remote_entries: &[RemoteFileEntry]) -> Vec<FileChangeIntent> {
        let remote_by_path: HashMap<&str, &RemoteFileEntry> = remote_entries
            .iter()
            .filter(|e| e.is_file())
            .map(|e| (e.path.as_str(), e))
            .collect();

        let mut changes = Vec::new();

        for entry in remote_entries.iter().filter(|e| e.is_file()) {
            match self.files.get(&entry.path) {
                None => changes.push(FileChangeIntent {
                    path: entry.path.clone(),
                    sha: Some(entry.sha.clone()),
                    kind: ChangeKind::Added,
                }),
                Some(record) if record.sha != entry.sha => changes.push(FileChangeIntent {
                    path: entry.path.clone(),
                    sha: Some(entry.sha.clone()),
                    kind: ChangeKind::Modified,
                }),
                Some(_) => {}
            }
        }

        for path in self.files.keys() {
            if !remote_by_path.contains_key(path.as_str()) {
                changes.push(FileChangeIntent {
                    path: path.clone(),
                    sha: None,
                    kind: ChangeKind::Deleted,
                });
            }
        }

        changes
    }

    /// Upserts the record for a successfully applied file
    pub fn record_applied(&mut self, path: &str, sha: &str, now_millis: i64) {
        self.files.insert(
            path.to_string(),
            LocalFileRecord {
                path: path.to_string(),
                sha: sha.to_string(),
                last_modified: now_millis,
            },
        );
    }

    /// Removes the record for `path`; removing an absent path is a no-op
    pub fn record_removed(&mut self, path: &str) {
        self.files.remove(path);
    }

    /// Stamps the document with the run's completion time and reference id
    pub fn stamp(&mut self, now_millis: i64, reference_id: Option<String>) {
        self.last_sync_timestamp = now_millis;
        if reference_id.is_some() {
            self.last_sync_reference_id = reference_id;
        }
    }
}
