//! End-to-end tests of the sync orchestrator
//!
//! Each test wires a ScriptedRemote, MemoryStore, and RecordingNotifier
//! into a SyncEngine and drives `run()`.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::sync::Notify;

use gitvault_core::domain::outcome::ErrorCategory;
use gitvault_sync::engine::SyncEngine;

use crate::common::{self, entry, MemoryStore, RecordingNotifier, ScriptedRemote};

fn build_engine(
    remote: ScriptedRemote,
) -> (
    Arc<SyncEngine>,
    Arc<ScriptedRemote>,
    Arc<MemoryStore>,
    Arc<RecordingNotifier>,
) {
    let remote = Arc::new(remote);
    let store = Arc::new(MemoryStore::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = Arc::new(SyncEngine::new(
        remote.clone(),
        store.clone(),
        notifier.clone(),
        &common::test_config(),
    ));
    (engine, remote, store, notifier)
}

#[tokio::test]
async fn test_added_file_is_written_and_tracked() {
    let (engine, _remote, store, _notifier) =
        build_engine(ScriptedRemote::with_manifest(vec![entry("a.md", "h1")]));

    let outcome = engine.run().await;

    assert!(outcome.success);
    assert_eq!(outcome.files_added, 1);
    assert_eq!(outcome.files_modified, 0);
    assert_eq!(outcome.files_deleted, 0);
    assert!(outcome.errors.is_empty());

    assert_eq!(store.contents("a.md").unwrap(), b"content of a.md");

    let state = store.state_document().expect("state not persisted");
    assert_eq!(state.files["a.md"].sha, "h1");
    assert!(state.last_sync_timestamp > 0);
    assert_eq!(state.last_sync_reference_id.as_deref(), Some("tree-sha"));
}

#[tokio::test]
async fn test_modified_file_is_updated() {
    let mut remote = ScriptedRemote::with_manifest(vec![entry("a.md", "h2")]);
    remote.files.insert("a.md".to_string(), b"new content".to_vec());
    let (engine, _remote, store, _notifier) = build_engine(remote);

    // Pre-existing state tracking a.md at h1, with stale content on disk.
    store.seed("a.md", b"old content");
    let mut doc = gitvault_core::domain::SyncStateDocument::new();
    doc.record_applied("a.md", "h1", 1_000);
    store.seed(common::STATE_PATH, &serde_json::to_vec(&doc).unwrap());

    let outcome = engine.run().await;

    assert!(outcome.success);
    assert_eq!(outcome.files_modified, 1);
    assert_eq!(outcome.files_added, 0);
    assert_eq!(store.contents("a.md").unwrap(), b"new content");
    assert_eq!(store.state_document().unwrap().files["a.md"].sha, "h2");
}

#[tokio::test]
async fn test_deleted_file_is_removed_from_storage_and_state() {
    let (engine, _remote, store, _notifier) = build_engine(ScriptedRemote::with_manifest(vec![]));

    store.seed("a.md", b"content");
    let mut doc = gitvault_core::domain::SyncStateDocument::new();
    doc.record_applied("a.md", "h1", 1_000);
    store.seed(common::STATE_PATH, &serde_json::to_vec(&doc).unwrap());

    let outcome = engine.run().await;

    assert!(outcome.success);
    assert_eq!(outcome.files_deleted, 1);
    assert!(store.contents("a.md").is_none());
    assert!(store.state_document().unwrap().files.is_empty());
}

#[tokio::test]
async fn test_deleting_already_absent_file_cleans_state_without_counting() {
    let (engine, _remote, store, _notifier) = build_engine(ScriptedRemote::with_manifest(vec![]));

    // Tracked in state but already gone from storage.
    let mut doc = gitvault_core::domain::SyncStateDocument::new();
    doc.record_applied("ghost.md", "h1", 1_000);
    store.seed(common::STATE_PATH, &serde_json::to_vec(&doc).unwrap());

    let outcome = engine.run().await;

    assert!(outcome.success);
    assert_eq!(outcome.files_deleted, 0);
    assert!(outcome.errors.is_empty());
    assert!(store.state_document().unwrap().files.is_empty());
}

#[tokio::test]
async fn test_no_changes_is_a_noop() {
    let (engine, _remote, store, _notifier) =
        build_engine(ScriptedRemote::with_manifest(vec![entry("a.md", "h1")]));

    let first = engine.run().await;
    assert!(first.success);
    assert_eq!(first.files_added, 1);

    let writes_after_first = store.writes.load(Ordering::SeqCst);

    let second = engine.run().await;
    assert!(second.success);
    assert_eq!(second.files_changed(), 0);
    assert!(second.errors.is_empty());
    // No writes at all on the second run, state included.
    assert_eq!(store.writes.load(Ordering::SeqCst), writes_after_first);
}

#[tokio::test]
async fn test_local_only_files_are_never_touched() {
    let (engine, _remote, store, _notifier) = build_engine(ScriptedRemote::with_manifest(vec![]));

    // Present in storage, absent from both state and manifest.
    store.seed("local-only.md", b"mine");

    let outcome = engine.run().await;

    assert!(outcome.success);
    assert_eq!(outcome.files_changed(), 0);
    assert_eq!(store.contents("local-only.md").unwrap(), b"mine");
}

#[tokio::test]
async fn test_partial_failures_are_aggregated_not_fatal() {
    let entries: Vec<_> = (0..10).map(|i| entry(&format!("f{i}.md"), &format!("h{i}"))).collect();
    let mut remote = ScriptedRemote::with_manifest(entries);
    for i in [2, 5, 8] {
        remote.fail_fetch.insert(format!("f{i}.md"));
    }
    let (engine, _remote, store, _notifier) = build_engine(remote);

    let outcome = engine.run().await;

    assert!(outcome.success, "per-file errors must not fail the run");
    assert_eq!(outcome.files_added + outcome.files_modified, 7);
    assert_eq!(outcome.errors.len(), 3);
    for err in &outcome.errors {
        assert_eq!(err.category, ErrorCategory::File);
        assert!(err.path.is_some());
    }

    // Only the seven succeeded files are tracked; the failed three will
    // re-diff as added next run.
    let state = store.state_document().unwrap();
    assert_eq!(state.files.len(), 7);
    assert!(!state.files.contains_key("f2.md"));
}

#[tokio::test]
async fn test_second_run_while_running_is_rejected() {
    let release = Arc::new(Notify::new());
    let mut remote = ScriptedRemote::with_manifest(vec![entry("a.md", "h1")]);
    remote.hold_listing = Some(release.clone());
    let (engine, remote, store, _notifier) = build_engine(remote);

    let first = tokio::spawn({
        let engine = engine.clone();
        async move { engine.run().await }
    });

    // Wait until the first run is inside the manifest fetch.
    while !remote.listing_entered.load(Ordering::SeqCst) {
        tokio::task::yield_now().await;
    }

    let second = engine.run().await;
    assert!(!second.success);
    assert_eq!(second.errors.len(), 1);
    assert!(second.errors[0].message.contains("already in progress"));
    // The rejected run issued no network request and wrote nothing.
    assert_eq!(remote.list_calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);

    release.notify_one();
    let first = first.await.unwrap();
    assert!(first.success);
    assert_eq!(first.files_added, 1);

    // The guard released the flag: a third run goes through.
    let third = engine.run().await;
    assert!(third.success);
}

#[tokio::test]
async fn test_missing_configuration_fails_fast() {
    let remote = ScriptedRemote::with_manifest(vec![entry("a.md", "h1")]);
    let remote = Arc::new(remote);
    let store = Arc::new(MemoryStore::default());
    let notifier = Arc::new(RecordingNotifier::default());

    let mut config = common::test_config();
    config.repository.token = String::new();
    let engine = SyncEngine::new(remote.clone(), store.clone(), notifier, &config);

    let outcome = engine.run().await;

    assert!(!outcome.success);
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].message.contains("not configured"));
    // No network attempted, no storage touched.
    assert_eq!(remote.list_calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_manifest_failure_aborts_with_single_error() {
    let mut remote = ScriptedRemote::with_manifest(vec![entry("a.md", "h1")]);
    remote.fail_listing = true;
    let (engine, _remote, store, notifier) = build_engine(remote);

    let outcome = engine.run().await;

    assert!(!outcome.success);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].category, ErrorCategory::Network);
    assert_eq!(outcome.files_changed(), 0);
    // No partial state mutation.
    assert!(store.state_document().is_none());
    assert!(notifier.saw("Sync failed"));
}

#[tokio::test]
async fn test_state_persist_failure_fails_the_run() {
    let (engine, _remote, store, _notifier) =
        build_engine(ScriptedRemote::with_manifest(vec![entry("a.md", "h1")]));
    store.fail_writes_to(common::STATE_PATH);

    let outcome = engine.run().await;

    assert!(!outcome.success);
    assert_eq!(outcome.files_added, 1);
    // The applied file stays on disk even though state was not saved.
    assert_eq!(store.contents("a.md").unwrap(), b"content of a.md");
    assert!(outcome
        .errors
        .iter()
        .any(|e| e.message.contains("sync state")));
}

#[tokio::test]
async fn test_truncated_listing_warns_and_proceeds() {
    let mut remote = ScriptedRemote::with_manifest(vec![entry("a.md", "h1")]);
    remote.truncated = true;
    let (engine, _remote, store, notifier) = build_engine(remote);

    let outcome = engine.run().await;

    assert!(outcome.success);
    assert_eq!(outcome.files_added, 1);
    assert!(store.contents("a.md").is_some());
    assert!(notifier.saw("truncated"));
}

#[tokio::test]
async fn test_progress_reported_above_threshold() {
    let entries: Vec<_> = (0..25).map(|i| entry(&format!("f{i}.md"), &format!("h{i}"))).collect();
    let (engine, _remote, _store, notifier) = build_engine(ScriptedRemote::with_manifest(entries));

    let outcome = engine.run().await;

    assert!(outcome.success);
    assert_eq!(outcome.files_added, 25);
    // 25 changes at batch size 10 is 3 batches above the threshold of 20.
    assert_eq!(notifier.progress_calls.load(Ordering::SeqCst), 3);
    assert_eq!(notifier.clear_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_no_progress_below_threshold() {
    let entries: Vec<_> = (0..5).map(|i| entry(&format!("f{i}.md"), &format!("h{i}"))).collect();
    let (engine, _remote, _store, notifier) = build_engine(ScriptedRemote::with_manifest(entries));

    let outcome = engine.run().await;

    assert!(outcome.success);
    assert_eq!(notifier.progress_calls.load(Ordering::SeqCst), 0);
}
