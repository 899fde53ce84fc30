//! Recursive tree listing
//!
//! Fetches the full file tree of the configured branch in a single
//! request and converts it into the port-level
//! [`RemoteManifest`](gitvault_core::domain::RemoteManifest).
//!
//! GitHub serves the whole recursive tree in one response; when the tree
//! exceeds the provider's entry/size limits the response carries
//! `"truncated": true` instead of paginating. A truncated listing is
//! surfaced as a warning on the manifest and the sync proceeds with the
//! partial list.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use gitvault_core::domain::errors::SyncError;
use gitvault_core::domain::manifest::{RemoteEntryKind, RemoteFileEntry, RemoteManifest};

use crate::client::GithubClient;

// ============================================================================
// GitHub API response types (JSON deserialization)
// ============================================================================

/// Raw response from the git trees API
///
/// Represents the JSON structure returned by:
/// `GET /repos/{owner}/{repo}/git/trees/{ref}?recursive=1`
#[derive(Debug, Deserialize)]
struct GitTreeResponse {
    /// SHA of the listed tree (the branch's root tree)
    sha: Option<String>,

    /// Flat list of every entry reachable from the root
    #[serde(default)]
    tree: Vec<GitTreeEntry>,

    /// True when the listing hit the provider's size ceiling
    #[serde(default)]
    truncated: bool,
}

/// One entry from the git trees API
#[derive(Debug, Deserialize)]
struct GitTreeEntry {
    /// Slash-separated path relative to the repository root
    path: String,

    /// Object type: "blob" for files, "tree" for directories
    #[serde(rename = "type")]
    kind: String,

    /// Blob SHA of the entry's content
    sha: String,

    /// Size in bytes (absent for trees)
    size: Option<u64>,
}

/// Converts a raw tree entry into a port-level manifest entry
///
/// Returns `None` for anything that is not a plain blob (trees, commits
/// for submodules); the manifest only carries files.
fn parse_entry(entry: GitTreeEntry) -> Option<RemoteFileEntry> {
    let kind = match entry.kind.as_str() {
        "blob" => RemoteEntryKind::File,
        "tree" => RemoteEntryKind::Directory,
        other => {
            debug!(path = %entry.path, kind = other, "skipping non-file tree entry");
            return None;
        }
    };

    if kind == RemoteEntryKind::Directory {
        return None;
    }

    Some(RemoteFileEntry {
        path: entry.path,
        sha: entry.sha,
        size: entry.size.unwrap_or(0),
        kind,
    })
}

/// Lists the full recursive file tree of the client's branch.
///
/// # Errors
/// Tagged per the taxonomy: `Auth`, `NotFound` (repository or branch
/// absent), `RateLimit`, `Network`, or `Malformed` when the payload does
/// not deserialize.
pub async fn list_files(client: &GithubClient) -> Result<RemoteManifest, SyncError> {
    let slug = client.slug();
    let path = format!(
        "/repos/{}/{}/git/trees/{}?recursive=1",
        slug.owner,
        slug.name,
        client.branch()
    );

    debug!(repo = %slug, branch = client.branch(), "listing remote tree");

    let response = client.get(&path).await?;
    if response.status() != StatusCode::OK {
        return Err(client.classify_error("tree listing", response).await);
    }

    let raw: GitTreeResponse = response
        .json()
        .await
        .map_err(|e| SyncError::Malformed(format!("tree listing: {e}")))?;

    if raw.truncated {
        warn!(
            repo = %slug,
            "tree listing truncated by the provider; syncing the partial list"
        );
    }

    let total = raw.tree.len();
    let entries: Vec<RemoteFileEntry> = raw.tree.into_iter().filter_map(parse_entry).collect();

    debug!(
        files = entries.len(),
        entries = total,
        truncated = raw.truncated,
        "tree listing returned"
    );

    Ok(RemoteManifest {
        entries,
        truncated: raw.truncated,
        reference_id: raw.sha,
    })
}
