//! Local vault adapter (secondary/driven adapter)
//!
//! Implements [`ILocalStore`] over `tokio::fs`, rooted at the vault
//! directory.
//!
//! ## Design Decisions
//!
//! - **Atomic writes**: write-to-temp + rename, so a crash mid-write
//!   never leaves a half-written note or a corrupt state document.
//! - **Path containment**: vault-relative paths only; absolute paths
//!   and `..` traversal are rejected before touching the filesystem.
//! - **Binary vs text**: the extension decides. Text writes validate
//!   UTF-8 so a mangled download surfaces as an error instead of
//!   landing as garbage in a note.

use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context};
use tracing::debug;

use gitvault_core::ports::local_store::{is_binary_extension, ILocalStore};

/// Filesystem-backed vault storage
#[derive(Debug, Clone)]
pub struct VaultStore {
    /// Absolute root of the vault
    root: PathBuf,
}

impl VaultStore {
    /// Creates a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Vault root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a vault-relative path, rejecting anything that would
    /// escape the root.
    fn resolve(&self, path: &str) -> anyhow::Result<PathBuf> {
        if path.is_empty() {
            bail!("empty path");
        }

        let relative = Path::new(path);
        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                Component::CurDir => {}
                other => bail!("path '{path}' escapes the vault ({other:?})"),
            }
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait::async_trait]
impl ILocalStore for VaultStore {
    async fn read(&self, path: &str) -> anyhow::Result<Vec<u8>> {
        let full = self.resolve(path)?;
        let data = tokio::fs::read(&full)
            .await
            .with_context(|| format!("reading {path}"))?;
        Ok(data)
    }

    async fn write(&self, path: &str, data: &[u8]) -> anyhow::Result<()> {
        let full = self.resolve(path)?;

        if !is_binary_extension(path) {
            std::str::from_utf8(data)
                .with_context(|| format!("{path}: text file is not valid UTF-8"))?;
        }

        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating parent directories for {path}"))?;
        }

        // Atomic replace: write a sibling temp file, then rename over
        // the target.
        let file_name = full
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| format!(".{n}.gitvault-tmp"))
            .context("path has no file name")?;
        let tmp = full.with_file_name(file_name);

        tokio::fs::write(&tmp, data)
            .await
            .with_context(|| format!("writing {path}"))?;
        tokio::fs::rename(&tmp, &full)
            .await
            .with_context(|| format!("replacing {path}"))?;

        debug!(path, bytes = data.len(), "vault write complete");
        Ok(())
    }

    async fn delete(&self, path: &str) -> anyhow::Result<bool> {
        let full = self.resolve(path)?;
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err).with_context(|| format!("deleting {path}")),
        }
    }

    async fn exists(&self, path: &str) -> anyhow::Result<bool> {
        let full = self.resolve(path)?;
        match tokio::fs::metadata(&full).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err).with_context(|| format!("checking {path}")),
        }
    }

    async fn create_dir_all(&self, path: &str) -> anyhow::Result<()> {
        let full = self.resolve(path)?;
        tokio::fs::create_dir_all(&full)
            .await
            .with_context(|| format!("creating directory {path}"))?;
        Ok(())
    }
}
