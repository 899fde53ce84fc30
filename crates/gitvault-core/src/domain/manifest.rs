//! Remote manifest types
//!
//! A manifest is the full recursive listing of file paths and blob SHAs
//! for a branch at sync time. It is produced fresh on every sync by the
//! remote repository adapter, consumed by the diff, and discarded.

use serde::{Deserialize, Serialize};

/// Kind of entry in a remote tree listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteEntryKind {
    /// A regular file (git blob)
    File,
    /// A directory (git tree); filtered out before diffing
    Directory,
}

/// One file in the remote manifest
///
/// `sha` is the provider's blob hash: an opaque content fingerprint,
/// stable across identical content. Equality of SHAs implies identical
/// content, which is all the diff relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFileEntry {
    /// Slash-separated path relative to the repository root
    pub path: String,
    /// Blob SHA of the file content
    pub sha: String,
    /// File size in bytes as reported by the listing
    pub size: u64,
    /// File or directory
    pub kind: RemoteEntryKind,
}

impl RemoteFileEntry {
    /// Returns true for regular files (the only entries the diff consumes)
    pub fn is_file(&self) -> bool {
        self.kind == RemoteEntryKind::File
    }
}

/// The full recursive listing for a branch
#[derive(Debug, Clone)]
pub struct RemoteManifest {
    /// File entries, in the provider's listing order (directories filtered)
    pub entries: Vec<RemoteFileEntry>,
    /// Whether the provider reported the listing as truncated
    ///
    /// A truncated listing is surfaced as a warning; the sync proceeds
    /// with the partial list.
    pub truncated: bool,
    /// Identifier of the listed tree (recorded as `lastSyncReferenceId`)
    pub reference_id: Option<String>,
}
