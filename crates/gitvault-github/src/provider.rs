//! GithubRemoteRepository - IRemoteRepository implementation
//!
//! Wraps the [`GithubClient`] and delegates to the tree and content
//! modules to fulfil the [`IRemoteRepository`] port contract.
//!
//! ## Design Notes
//!
//! - The client is immutable after construction (the bearer token is
//!   fixed for the process lifetime), so no interior mutability is
//!   needed; the provider is a plain wrapper.
//! - All retry/fallback policy lives below this type, in the content
//!   module's tier chain; the provider adds nothing but delegation.

use tracing::debug;

use gitvault_core::domain::errors::SyncError;
use gitvault_core::domain::manifest::RemoteManifest;
use gitvault_core::ports::remote_repository::{IRemoteRepository, QuotaStatus};

use crate::client::GithubClient;
use crate::content;
use crate::tree;

/// Remote repository implementation backed by the GitHub REST API
pub struct GithubRemoteRepository {
    /// The underlying API client
    client: GithubClient,
}

impl GithubRemoteRepository {
    /// Creates a new provider wrapping the given [`GithubClient`]
    pub fn new(client: GithubClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl IRemoteRepository for GithubRemoteRepository {
    /// Lists the branch's recursive file tree
    ///
    /// Delegates to [`tree::list_files`].
    async fn list_files(&self) -> Result<RemoteManifest, SyncError> {
        debug!(repo = %self.client.slug(), "GithubRemoteRepository::list_files");
        tree::list_files(&self.client).await
    }

    /// Fetches one file's bytes through the fallback chain
    ///
    /// Delegates to [`content::fetch_file_bytes`].
    async fn fetch_file_bytes(&self, path: &str, sha: Option<&str>) -> Result<Vec<u8>, SyncError> {
        debug!(path, has_sha = sha.is_some(), "GithubRemoteRepository::fetch_file_bytes");
        content::fetch_file_bytes(&self.client, path, sha).await
    }

    /// Probes the repository metadata endpoint
    async fn test_reachability(&self) -> bool {
        self.client.test_reachability().await
    }

    /// Queries the core API quota
    async fn quota_status(&self) -> QuotaStatus {
        self.client.quota_status().await
    }
}
