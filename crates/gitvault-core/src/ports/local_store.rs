//! Local storage port (driven/secondary port)
//!
//! This module defines the interface to the host's hierarchical file
//! store (the "vault"). The engine only ever touches paths it tracks in
//! the state document, so implementations need no knowledge of the sync
//! protocol.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because storage errors are adapter-specific
//!   and don't need domain-level classification; the engine wraps them
//!   into `SyncError::StorageFailure` at its boundary.
//! - Paths are vault-relative, slash-separated, and never absolute.
//! - `delete` reports whether a file actually existed: the orchestrator
//!   counts a deletion only when something was really removed, while
//!   state cleanup happens either way.

/// File extensions treated as binary content
///
/// Everything else is written through the text path, which validates
/// UTF-8. The list mirrors the attachment types a typical vault holds.
const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "svg", "ico", "pdf", "mp3", "wav", "ogg", "flac",
    "mp4", "webm", "mov", "avi", "zip", "gz", "tar", "7z", "woff", "woff2", "ttf", "otf", "bin",
    "exe", "dylib", "so",
];

/// Returns true when `path`'s extension marks it as binary content
pub fn is_binary_extension(path: &str) -> bool {
    path.rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            BINARY_EXTENSIONS.iter().any(|b| *b == ext)
        })
        .unwrap_or(false)
}

/// Port trait for local vault storage
#[async_trait::async_trait]
pub trait ILocalStore: Send + Sync {
    /// Reads the entire contents of a file
    async fn read(&self, path: &str) -> anyhow::Result<Vec<u8>>;

    /// Writes `data` to `path`, creating the file and any missing parent
    /// directories, replacing existing content.
    ///
    /// Implementations choose the text or binary write path based on the
    /// file extension (see [`is_binary_extension`]).
    async fn write(&self, path: &str, data: &[u8]) -> anyhow::Result<()>;

    /// Deletes the file at `path`.
    ///
    /// # Returns
    /// `true` when a file existed and was removed, `false` when the path
    /// was already absent. Absence is not an error.
    async fn delete(&self, path: &str) -> anyhow::Result<bool>;

    /// Returns whether a file exists at `path`
    async fn exists(&self, path: &str) -> anyhow::Result<bool>;

    /// Creates a directory (and parents) at `path`; existing is fine
    async fn create_dir_all(&self, path: &str) -> anyhow::Result<()>;
}
