//! GitHub API client
//!
//! Provides a typed HTTP client for the GitHub REST API. Handles
//! authentication headers, endpoint construction, and the mapping from
//! HTTP status codes to the tagged [`SyncError`] taxonomy.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gitvault_github::client::GithubClient;
//! use gitvault_core::config::RepoSlug;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let slug: RepoSlug = "acme/notes".parse()?;
//! let client = GithubClient::new("ghp-token", slug, "main");
//! let reachable = client.test_reachability().await;
//! println!("reachable: {reachable}");
//! # Ok(())
//! # }
//! ```

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use gitvault_core::config::RepoSlug;
use gitvault_core::domain::errors::SyncError;
use gitvault_core::ports::remote_repository::QuotaStatus;

/// Base URL for the GitHub REST API
const GITHUB_API_BASE: &str = "https://api.github.com";

/// Base URL for the raw content mirror
const GITHUB_RAW_BASE: &str = "https://raw.githubusercontent.com";

/// API version header value pinned by this client
const API_VERSION: &str = "2022-11-28";

/// Maximum number of body bytes echoed into error messages
const BODY_EXCERPT_LEN: usize = 200;

// ============================================================================
// GitHub API response types
// ============================================================================

/// Response from the /rate_limit endpoint
#[derive(Debug, Deserialize)]
struct RateLimitResponse {
    resources: RateLimitResources,
}

#[derive(Debug, Deserialize)]
struct RateLimitResources {
    core: RateLimitWindow,
}

/// One quota window from the rate limit response
#[derive(Debug, Deserialize)]
struct RateLimitWindow {
    limit: Option<u64>,
    remaining: Option<u64>,
    reset: Option<u64>,
}

// ============================================================================
// GithubClient
// ============================================================================

/// HTTP client for GitHub REST API calls
///
/// Wraps `reqwest::Client` with bearer authentication, the GitHub accept
/// and version headers, and base URL construction. The raw content
/// mirror uses a separate base URL because it is a different host with
/// an unstructured (non-JSON) response surface.
pub struct GithubClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for structured API requests
    api_base: String,
    /// Base URL for the raw content mirror
    raw_base: String,
    /// Bearer credential
    token: String,
    /// Repository identity
    slug: RepoSlug,
    /// Branch this client is scoped to
    branch: String,
}

impl GithubClient {
    /// Creates a new client for `slug` at `branch`
    pub fn new(token: impl Into<String>, slug: RepoSlug, branch: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: GITHUB_API_BASE.to_string(),
            raw_base: GITHUB_RAW_BASE.to_string(),
            token: token.into(),
            slug,
            branch: branch.into(),
        }
    }

    /// Creates a client with custom base URLs (useful for testing)
    pub fn with_base_urls(
        token: impl Into<String>,
        slug: RepoSlug,
        branch: impl Into<String>,
        api_base: impl Into<String>,
        raw_base: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            raw_base: raw_base.into(),
            token: token.into(),
            slug,
            branch: branch.into(),
        }
    }

    /// Repository identity this client is bound to
    pub fn slug(&self) -> &RepoSlug {
        &self.slug
    }

    /// Branch this client is scoped to
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Base URL of the raw content mirror
    pub(crate) fn raw_base(&self) -> &str {
        &self.raw_base
    }

    /// Underlying HTTP client, for requests against absolute URLs
    pub(crate) fn http_client(&self) -> &Client {
        &self.client
    }

    /// Bearer credential
    pub(crate) fn token(&self) -> &str {
        &self.token
    }

    /// Creates an authenticated request builder for the given method and
    /// API path (relative to the API base URL).
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.api_base, path);
        self.client
            .request(method, &url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", "gitvault")
    }

    /// Sends a GET for `path` and returns the response, mapping
    /// transport errors to [`SyncError::Network`]. Status classification
    /// is the caller's job via [`Self::classify_error`].
    pub(crate) async fn get(&self, path: &str) -> Result<Response, SyncError> {
        self.request(Method::GET, path)
            .send()
            .await
            .map_err(|e| SyncError::Network(format!("GET {path}: {e}")))
    }

    /// Maps a non-200 response onto the tagged error taxonomy.
    ///
    /// Exactly HTTP 200 is success; everything else is an error carrying
    /// the status and a body excerpt. A 403 with an exhausted quota
    /// header (and any 429) becomes [`SyncError::RateLimit`] with the
    /// reset time; other 401/403 become [`SyncError::Auth`]; 404 becomes
    /// [`SyncError::NotFound`].
    pub(crate) async fn classify_error(&self, context: &str, response: Response) -> SyncError {
        let status = response.status();
        let remaining = header_u64(&response, "x-ratelimit-remaining");
        let reset = header_u64(&response, "x-ratelimit-reset").unwrap_or(0);
        let body = response.text().await.unwrap_or_default();
        let excerpt: String = body.chars().take(BODY_EXCERPT_LEN).collect();

        if status == StatusCode::TOO_MANY_REQUESTS
            || (status == StatusCode::FORBIDDEN && remaining == Some(0))
        {
            return SyncError::RateLimit {
                message: format!("{context}: HTTP {status}: {excerpt}"),
                reset_epoch_seconds: reset,
            };
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                SyncError::Auth(format!("{context}: HTTP {status}: {excerpt}"))
            }
            StatusCode::NOT_FOUND => SyncError::NotFound(format!("{context}: {excerpt}")),
            _ => SyncError::Network(format!("{context}: HTTP {status}: {excerpt}")),
        }
    }

    /// Performs a minimal authenticated probe against the repository
    /// metadata endpoint.
    ///
    /// Success/failure only, never errors: any transport failure or
    /// non-200 status is reported as unreachable.
    pub async fn test_reachability(&self) -> bool {
        let path = format!("/repos/{}/{}", self.slug.owner, self.slug.name);
        debug!(repo = %self.slug, "probing repository metadata");

        match self.get(&path).await {
            Ok(response) if response.status() == StatusCode::OK => true,
            Ok(response) => {
                debug!(status = %response.status(), "reachability probe rejected");
                false
            }
            Err(err) => {
                debug!(%err, "reachability probe failed");
                false
            }
        }
    }

    /// Retrieves the current core API quota.
    ///
    /// Defaults to all-zero on any failure rather than failing the
    /// caller; a status display is never worth aborting for.
    pub async fn quota_status(&self) -> QuotaStatus {
        let response = match self.get("/rate_limit").await {
            Ok(r) => r,
            Err(err) => {
                warn!(%err, "quota query failed");
                return QuotaStatus::default();
            }
        };

        if response.status() != StatusCode::OK {
            warn!(status = %response.status(), "quota query rejected");
            return QuotaStatus::default();
        }

        match response.json::<RateLimitResponse>().await {
            Ok(parsed) => QuotaStatus {
                limit: parsed.resources.core.limit.unwrap_or(0),
                remaining: parsed.resources.core.remaining.unwrap_or(0),
                reset_epoch_seconds: parsed.resources.core.reset.unwrap_or(0),
            },
            Err(err) => {
                warn!(%err, "failed to parse quota response");
                QuotaStatus::default()
            }
        }
    }
}

/// Reads a numeric header value, if present and parseable
fn header_u64(response: &Response, name: &str) -> Option<u64> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}
