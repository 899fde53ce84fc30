//! Status command - show what the last sync recorded

use std::sync::Arc;

use anyhow::Result;
use chrono::DateTime;
use clap::Args;

use gitvault_core::config::Config;
use gitvault_sync::state::SyncStateStore;
use gitvault_sync::vault::VaultStore;

use crate::output::Output;

#[derive(Debug, Args)]
pub struct StatusCommand {}

impl StatusCommand {
    pub async fn execute(&self, config: &Config, out: &Output) -> Result<()> {
        let store = Arc::new(VaultStore::new(config.sync.vault_root.clone()));
        let state_store = SyncStateStore::new(store, config.sync.state_path.clone());
        let state = state_store.load().await;

        if out.is_json() {
            out.print_json(&serde_json::json!({
                "repository": config.repository.repo,
                "branch": config.repository.branch_or_default(),
                "vault_root": config.sync.vault_root,
                "auto_sync_on_start": config.repository.auto_sync_on_start,
                "last_sync_timestamp": state.last_sync_timestamp,
                "last_sync_reference_id": state.last_sync_reference_id,
                "tracked_files": state.files.len(),
            }));
            return Ok(());
        }

        out.info(&format!("Repository:   {}", config.repository.repo));
        out.info(&format!(
            "Branch:       {}",
            config.repository.branch_or_default()
        ));
        out.info(&format!(
            "Vault:        {}",
            config.sync.vault_root.display()
        ));
        out.info(&format!(
            "Auto-sync:    {}",
            if config.repository.auto_sync_on_start {
                "on startup"
            } else {
                "manual"
            }
        ));

        if state.last_sync_timestamp == 0 {
            out.info("Last sync:    never");
        } else {
            let when = DateTime::from_timestamp_millis(state.last_sync_timestamp)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| state.last_sync_timestamp.to_string());
            out.info(&format!("Last sync:    {}", when));
        }
        out.info(&format!("Tracked:      {} files", state.files.len()));

        Ok(())
    }
}
