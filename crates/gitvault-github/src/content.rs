//! File content retrieval with the large-file fallback chain
//!
//! The contents API silently omits content for files above ~1 MiB: the
//! response is a normal 200 whose `content` field is blank while `size`
//! is nonzero, with no distinguishable error in all provider versions.
//! Retrieval therefore walks three tiers in fixed order, each tier's
//! failure falling through to the next:
//!
//! 1. **Contents API** (path-addressed, branch-scoped) - blank or
//!    zero-decoding content with nonzero reported size is a tier failure.
//! 2. **Raw content mirror** (direct byte fetch, effective to ~100 MiB) -
//!    path segments are percent-encoded individually; an empty body is a
//!    failure, not success.
//! 3. **Blob API** (fingerprint-addressed) - last resort, requires the
//!    blob SHA and is itself ~1 MiB-limited; useful where tier 1 reports
//!    a size-triggered error explicitly instead of silent emptiness.
//!
//! Content arrives base64-encoded with embedded newlines; all whitespace
//! is stripped before decoding.

use base64::Engine;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use gitvault_core::domain::errors::SyncError;

use crate::client::GithubClient;

// ============================================================================
// GitHub API response types
// ============================================================================

/// Body shape shared by the contents API and the blob API
#[derive(Debug, Deserialize)]
struct ContentResponse {
    /// Base64 content, possibly blank, possibly newline-wrapped
    content: Option<String>,
    /// Declared encoding ("base64", or "none" when content was omitted)
    encoding: Option<String>,
    /// Reported size of the decoded content in bytes
    size: Option<u64>,
}

// ============================================================================
// Decoding
// ============================================================================

/// Decodes a content payload, enforcing the emptiness rules.
///
/// Fails when the content field is blank despite a nonzero reported
/// size, when the base64 does not decode, or when decoding yields zero
/// bytes for a nonzero reported size. A blank payload with zero (or
/// unreported) size is a legitimately empty file.
fn decode_content_payload(
    content: Option<&str>,
    encoding: Option<&str>,
    size: Option<u64>,
) -> Result<Vec<u8>, String> {
    let reported_size = size.unwrap_or(0);
    let raw = content.unwrap_or("");
    let stripped: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    if stripped.is_empty() {
        if reported_size > 0 {
            return Err(format!(
                "content omitted by provider (reported size {reported_size} bytes)"
            ));
        }
        return Ok(Vec::new());
    }

    if let Some(enc) = encoding {
        if enc != "base64" {
            return Err(format!("unexpected content encoding '{enc}'"));
        }
    }

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(stripped.as_bytes())
        .map_err(|e| format!("invalid base64 content: {e}"))?;

    if decoded.is_empty() && reported_size > 0 {
        return Err(format!(
            "content decoded to zero bytes (reported size {reported_size} bytes)"
        ));
    }

    Ok(decoded)
}

// ============================================================================
// Retrieval tiers
// ============================================================================

/// Tier 1: path-addressed contents API
async fn fetch_via_contents_api(client: &GithubClient, path: &str) -> Result<Vec<u8>, SyncError> {
    let slug = client.slug();
    let api_path = format!(
        "/repos/{}/{}/contents/{}?ref={}",
        slug.owner,
        slug.name,
        path,
        client.branch()
    );

    let response = client.get(&api_path).await?;
    if response.status() != StatusCode::OK {
        return Err(client.classify_error("contents API", response).await);
    }

    let body: ContentResponse = response
        .json()
        .await
        .map_err(|e| SyncError::Malformed(format!("contents API: {e}")))?;

    decode_content_payload(body.content.as_deref(), body.encoding.as_deref(), body.size)
        .map_err(SyncError::Malformed)
}

/// Tier 2: raw content mirror
///
/// The URL is assembled through `Url::path_segments_mut` so that every
/// path segment is percent-encoded individually; encoding the joined
/// path would corrupt names containing `%`, spaces, or non-ASCII.
async fn fetch_via_raw_mirror(client: &GithubClient, path: &str) -> Result<Vec<u8>, SyncError> {
    let slug = client.slug();
    let mut url = url::Url::parse(client.raw_base())
        .map_err(|e| SyncError::Network(format!("raw mirror base URL: {e}")))?;

    url.path_segments_mut()
        .map_err(|_| SyncError::Network("raw mirror base URL cannot carry a path".to_string()))?
        .pop_if_empty()
        .extend([slug.owner.as_str(), slug.name.as_str(), client.branch()])
        .extend(path.split('/'));

    let response = client
        .http_client()
        .get(url.clone())
        .bearer_auth(client.token())
        .header("User-Agent", "gitvault")
        .send()
        .await
        .map_err(|e| SyncError::Network(format!("raw mirror: {e}")))?;

    if response.status() != StatusCode::OK {
        return Err(client.classify_error("raw mirror", response).await);
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| SyncError::Network(format!("raw mirror body: {e}")))?;

    if bytes.is_empty() {
        return Err(SyncError::Malformed(
            "raw mirror returned an empty body".to_string(),
        ));
    }

    Ok(bytes.to_vec())
}

/// Tier 3: fingerprint-addressed blob API
async fn fetch_via_blob_api(client: &GithubClient, sha: &str) -> Result<Vec<u8>, SyncError> {
    let slug = client.slug();
    let api_path = format!("/repos/{}/{}/git/blobs/{}", slug.owner, slug.name, sha);

    let response = client.get(&api_path).await?;
    if response.status() != StatusCode::OK {
        return Err(client.classify_error("blob API", response).await);
    }

    let body: ContentResponse = response
        .json()
        .await
        .map_err(|e| SyncError::Malformed(format!("blob API: {e}")))?;

    decode_content_payload(body.content.as_deref(), body.encoding.as_deref(), body.size)
        .map_err(SyncError::Malformed)
}

// ============================================================================
// The fallback chain
// ============================================================================

/// Fetches the bytes of one file, walking the tiers in order.
///
/// Every tier failure is logged and falls through. When all tiers have
/// failed: if every failure was the same kind of `NotFound`, `Auth`, or
/// `Network` error that kind is returned (the file is genuinely absent,
/// the credential is bad, the network is down); any other mix becomes
/// [`SyncError::TooLargeExhausted`] carrying the per-tier detail.
pub async fn fetch_file_bytes(
    client: &GithubClient,
    path: &str,
    sha: Option<&str>,
) -> Result<Vec<u8>, SyncError> {
    let mut failures: Vec<(&str, SyncError)> = Vec::new();

    match fetch_via_contents_api(client, path).await {
        Ok(bytes) => {
            debug!(path, bytes = bytes.len(), "fetched via contents API");
            return Ok(bytes);
        }
        Err(err) => {
            warn!(path, %err, "contents API tier failed, trying raw mirror");
            failures.push(("contents API", err));
        }
    }

    match fetch_via_raw_mirror(client, path).await {
        Ok(bytes) => {
            debug!(path, bytes = bytes.len(), "fetched via raw mirror");
            return Ok(bytes);
        }
        Err(err) => {
            warn!(path, %err, "raw mirror tier failed");
            failures.push(("raw mirror", err));
        }
    }

    match sha {
        Some(sha) => match fetch_via_blob_api(client, sha).await {
            Ok(bytes) => {
                debug!(path, sha, bytes = bytes.len(), "fetched via blob API");
                return Ok(bytes);
            }
            Err(err) => {
                warn!(path, sha, %err, "blob API tier failed");
                failures.push(("blob API", err));
            }
        },
        None => {
            // This tier cannot run without a fingerprint.
            failures.push((
                "blob API",
                SyncError::Malformed(
                    "blob tier unavailable: no content fingerprint supplied".to_string(),
                ),
            ));
        }
    }

    Err(exhausted_error(path, failures))
}

/// Folds the per-tier failures into the chain's overall error
fn exhausted_error(path: &str, mut failures: Vec<(&str, SyncError)>) -> SyncError {
    fn uniform(failures: &[(&str, SyncError)], pred: fn(&SyncError) -> bool) -> bool {
        !failures.is_empty() && failures.iter().all(|(_, e)| pred(e))
    }

    if uniform(&failures, |e| matches!(e, SyncError::NotFound(_)))
        || uniform(&failures, |e| matches!(e, SyncError::Auth(_)))
        || uniform(&failures, |e| matches!(e, SyncError::Network(_)))
    {
        return failures.remove(0).1;
    }

    let detail = failures
        .iter()
        .map(|(tier, err)| format!("{tier}: {err}"))
        .collect::<Vec<_>>()
        .join("; ");

    SyncError::TooLargeExhausted {
        path: path.to_string(),
        detail,
    }
}
