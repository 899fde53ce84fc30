//! Configuration module for GitVault.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, defaults, and the single repository-slug parse rule.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::SyncError;

// ---------------------------------------------------------------------------
// Repository slug
// ---------------------------------------------------------------------------

/// A normalized `owner/name` repository identity.
///
/// Accepts either the bare `owner/name` form or a full URL. One parse
/// rule covers both: optional scheme, `git@github.com:` or `github.com/`
/// host prefix stripped, trailing `.git` and slashes stripped, and what
/// remains must be exactly two non-empty segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSlug {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl FromStr for RepoSlug {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rest = s.trim();
        for prefix in ["https://", "http://", "ssh://"] {
            rest = rest.strip_prefix(prefix).unwrap_or(rest);
        }
        rest = rest.strip_prefix("git@github.com:").unwrap_or(rest);
        rest = rest.strip_prefix("www.github.com/").unwrap_or(rest);
        rest = rest.strip_prefix("github.com/").unwrap_or(rest);
        rest = rest.trim_end_matches('/');
        rest = rest.strip_suffix(".git").unwrap_or(rest);

        let mut parts = rest.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                Ok(RepoSlug {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(SyncError::ConfigurationMissing(format!(
                "'{s}' is not a valid repository (expected owner/name or a GitHub URL)"
            ))),
        }
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for GitVault.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub repository: RepositoryConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

/// Remote repository settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Repository identity, `owner/name` or a full GitHub URL.
    pub repo: String,
    /// Bearer token (personal access token). Empty means unconfigured.
    pub token: String,
    /// Branch to mirror; blank falls back to `"main"`.
    pub branch: String,
    /// Whether `gitvault sync` should run automatically on startup hooks.
    pub auto_sync_on_start: bool,
}

impl RepositoryConfig {
    /// Branch to mirror, applying the `"main"` default for blank values.
    pub fn branch_or_default(&self) -> &str {
        if self.branch.trim().is_empty() {
            "main"
        } else {
            self.branch.trim()
        }
    }

    /// Parses the configured repository identity.
    pub fn slug(&self) -> Result<RepoSlug, SyncError> {
        self.repo.parse()
    }

    /// Checks that both repository identity and credential are present.
    ///
    /// The engine calls this before touching network or storage.
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.repo.trim().is_empty() {
            return Err(SyncError::ConfigurationMissing(
                "no repository configured".to_string(),
            ));
        }
        self.slug()?;
        if self.token.trim().is_empty() {
            return Err(SyncError::ConfigurationMissing(
                "no access token configured".to_string(),
            ));
        }
        Ok(())
    }
}

/// Synchronization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Root directory of the local vault mirror.
    pub vault_root: PathBuf,
    /// Vault-relative path of the persisted sync state document.
    pub state_path: String,
    /// Number of per-file applies that run concurrently within a batch.
    pub batch_size: usize,
    /// Changed-file count above which per-batch progress is reported.
    pub progress_threshold: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            vault_root: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("~"))
                .join("vault"),
            state_path: ".gitvault/sync-state.json".to_string(),
            batch_size: 10,
            progress_threshold: 20,
        }
    }
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/gitvault/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("gitvault")
            .join("config.yaml")
    }
}
