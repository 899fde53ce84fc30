//! Check command - repository reachability probe and quota display

use anyhow::Result;
use clap::Args;

use gitvault_core::config::Config;
use gitvault_github::client::GithubClient;

use crate::output::Output;

#[derive(Debug, Args)]
pub struct CheckCommand {}

impl CheckCommand {
    pub async fn execute(&self, config: &Config, out: &Output) -> Result<()> {
        if let Err(err) = config.repository.validate() {
            out.error(&err.to_string());
            return Ok(());
        }

        let slug = config.repository.slug()?;
        let branch = config.repository.branch_or_default();
        let client = GithubClient::new(config.repository.token.clone(), slug.clone(), branch);

        let reachable = client.test_reachability().await;
        let quota = client.quota_status().await;

        if out.is_json() {
            out.print_json(&serde_json::json!({
                "repository": slug.to_string(),
                "reachable": reachable,
                "quota": {
                    "limit": quota.limit,
                    "remaining": quota.remaining,
                    "reset_epoch_seconds": quota.reset_epoch_seconds,
                }
            }));
            return Ok(());
        }

        if reachable {
            out.success(&format!("{} is reachable", slug));
        } else {
            out.error(&format!(
                "{} is not reachable (check the repository name and token)",
                slug
            ));
        }

        if quota.limit == 0 {
            out.info("Quota:     unknown");
        } else {
            out.info(&format!(
                "Quota:     {}/{} requests remaining",
                quota.remaining, quota.limit
            ));
        }

        Ok(())
    }
}
