//! Integration tests for the recursive tree listing
//!
//! Verifies end-to-end behavior of the tree module against a wiremock
//! mock server: file/directory filtering, truncation reporting, and
//! error classification for missing branches and bad credentials.

use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use gitvault_core::domain::SyncError;
use gitvault_github::tree;

use crate::common;

#[tokio::test]
async fn test_list_files_filters_directories() {
    let (api, _raw, client) = common::setup_github_mock().await;

    let entries = serde_json::json!([
        { "path": "README.md", "mode": "100644", "type": "blob", "sha": "h1", "size": 120 },
        { "path": "notes", "mode": "040000", "type": "tree", "sha": "t1" },
        { "path": "notes/daily.md", "mode": "100644", "type": "blob", "sha": "h2", "size": 64 }
    ]);
    common::mount_tree(&api, entries, false).await;

    let manifest = tree::list_files(&client).await.expect("listing failed");

    assert_eq!(manifest.entries.len(), 2);
    assert_eq!(manifest.entries[0].path, "README.md");
    assert_eq!(manifest.entries[0].sha, "h1");
    assert_eq!(manifest.entries[1].path, "notes/daily.md");
    assert!(!manifest.truncated);
    assert_eq!(manifest.reference_id.as_deref(), Some("root-tree-sha"));
}

#[tokio::test]
async fn test_list_files_preserves_listing_order() {
    let (api, _raw, client) = common::setup_github_mock().await;

    let entries = serde_json::json!([
        { "path": "z.md", "mode": "100644", "type": "blob", "sha": "1", "size": 1 },
        { "path": "a.md", "mode": "100644", "type": "blob", "sha": "2", "size": 1 },
        { "path": "m.md", "mode": "100644", "type": "blob", "sha": "3", "size": 1 }
    ]);
    common::mount_tree(&api, entries, false).await;

    let manifest = tree::list_files(&client).await.unwrap();
    let paths: Vec<&str> = manifest.entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["z.md", "a.md", "m.md"]);
}

#[tokio::test]
async fn test_list_files_surfaces_truncation() {
    let (api, _raw, client) = common::setup_github_mock().await;

    let entries = serde_json::json!([
        { "path": "a.md", "mode": "100644", "type": "blob", "sha": "1", "size": 1 }
    ]);
    common::mount_tree(&api, entries, true).await;

    let manifest = tree::list_files(&client).await.unwrap();
    assert!(manifest.truncated);
    assert_eq!(manifest.entries.len(), 1);
}

#[tokio::test]
async fn test_list_files_missing_branch_is_not_found() {
    let (api, _raw, client) = common::setup_github_mock().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/notes/git/trees/main"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "Not Found"
        })))
        .mount(&api)
        .await;

    let err = tree::list_files(&client).await.unwrap_err();
    assert!(matches!(err, SyncError::NotFound(_)));
}

#[tokio::test]
async fn test_list_files_bad_credentials_is_auth() {
    let (api, _raw, client) = common::setup_github_mock().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/notes/git/trees/main"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "Bad credentials"
        })))
        .mount(&api)
        .await;

    let err = tree::list_files(&client).await.unwrap_err();
    match err {
        SyncError::Auth(msg) => assert!(msg.contains("Bad credentials")),
        other => panic!("expected Auth, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_files_exhausted_quota_is_rate_limit() {
    let (api, _raw, client) = common::setup_github_mock().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/notes/git/trees/main"))
        .respond_with(
            ResponseTemplate::new(403)
                .append_header("x-ratelimit-remaining", "0")
                .append_header("x-ratelimit-reset", "1700000000")
                .set_body_json(serde_json::json!({
                    "message": "API rate limit exceeded"
                })),
        )
        .mount(&api)
        .await;

    let err = tree::list_files(&client).await.unwrap_err();
    match err {
        SyncError::RateLimit {
            reset_epoch_seconds,
            ..
        } => assert_eq!(reset_epoch_seconds, 1_700_000_000),
        other => panic!("expected RateLimit, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_files_malformed_payload() {
    let (api, _raw, client) = common::setup_github_mock().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/notes/git/trees/main"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&api)
        .await;

    let err = tree::list_files(&client).await.unwrap_err();
    assert!(matches!(err, SyncError::Malformed(_)));
}
