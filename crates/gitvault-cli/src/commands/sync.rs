//! Sync command - mirror the remote branch into the vault
//!
//! Wires the GitHub adapter, vault store, and console notifier into the
//! SyncEngine, runs it once, and renders the outcome.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tracing::info;

use gitvault_core::config::Config;
use gitvault_github::client::GithubClient;
use gitvault_github::provider::GithubRemoteRepository;
use gitvault_sync::engine::SyncEngine;
use gitvault_sync::vault::VaultStore;

use crate::notify::ConsoleNotifier;
use crate::output::Output;

#[derive(Debug, Args)]
pub struct SyncCommand {}

impl SyncCommand {
    pub async fn execute(&self, config: &Config, out: &Output) -> Result<()> {
        // Fail early on configuration problems so the user gets a
        // message instead of an engine outcome.
        if let Err(err) = config.repository.validate() {
            out.error(&err.to_string());
            out.info("Set repository.repo and repository.token in the config file.");
            return Ok(());
        }

        let slug = config.repository.slug()?;
        let branch = config.repository.branch_or_default();

        info!(repo = %slug, branch, vault = %config.sync.vault_root.display(), "sync requested");

        let client = GithubClient::new(config.repository.token.clone(), slug, branch);
        let remote = Arc::new(GithubRemoteRepository::new(client));
        let store = Arc::new(VaultStore::new(config.sync.vault_root.clone()));
        let notifier = Arc::new(ConsoleNotifier::new(out.is_json()));

        let engine = SyncEngine::new(remote, store, notifier, config);
        let outcome = engine.run().await;

        if out.is_json() {
            out.print_json(&serde_json::to_value(&outcome)?);
            return Ok(());
        }

        if outcome.success {
            if outcome.files_changed() == 0 && outcome.errors.is_empty() {
                out.success("Already up to date");
            } else {
                out.success(&format!(
                    "Sync completed: {} added, {} modified, {} deleted",
                    outcome.files_added, outcome.files_modified, outcome.files_deleted
                ));
            }
        } else {
            out.error(
                &outcome
                    .errors
                    .first()
                    .map(|e| e.message.clone())
                    .unwrap_or_else(|| "sync failed".to_string()),
            );
        }

        // Per-file errors are aggregated, not fatal; show them after the
        // summary.
        let file_errors: Vec<_> = outcome.errors.iter().filter(|e| e.path.is_some()).collect();
        if !file_errors.is_empty() {
            out.warn(&format!(
                "{} file{} failed to sync:",
                file_errors.len(),
                if file_errors.len() == 1 { "" } else { "s" }
            ));
            for err in file_errors {
                out.info(&format!(
                    "  {} - {}",
                    err.path.as_deref().unwrap_or("?"),
                    err.message
                ));
            }
        }

        Ok(())
    }
}
