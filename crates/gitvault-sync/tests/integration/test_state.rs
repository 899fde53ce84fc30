//! Tests for the state store's load/persist behavior

use std::sync::Arc;

use gitvault_core::domain::{SyncError, SyncStateDocument};
use gitvault_sync::state::SyncStateStore;

use crate::common::{self, MemoryStore};

#[tokio::test]
async fn test_load_missing_state_starts_fresh() {
    let store = Arc::new(MemoryStore::default());
    let state_store = SyncStateStore::new(store, common::STATE_PATH);

    let doc = state_store.load().await;
    assert_eq!(doc.last_sync_timestamp, 0);
    assert!(doc.files.is_empty());
}

#[tokio::test]
async fn test_load_corrupt_state_starts_fresh() {
    let store = Arc::new(MemoryStore::default());
    store.seed(common::STATE_PATH, b"{ this is not json");
    let state_store = SyncStateStore::new(store, common::STATE_PATH);

    let doc = state_store.load().await;
    assert!(doc.files.is_empty());
}

#[tokio::test]
async fn test_persist_then_load_roundtrip() {
    let store = Arc::new(MemoryStore::default());
    let state_store = SyncStateStore::new(store, common::STATE_PATH);

    let mut doc = SyncStateDocument::new();
    doc.record_applied("notes/a.md", "h1", 1_234);
    doc.stamp(5_678, Some("tree-sha".to_string()));

    state_store.persist(&doc).await.expect("persist failed");
    let loaded = state_store.load().await;

    assert_eq!(loaded.last_sync_timestamp, 5_678);
    assert_eq!(loaded.last_sync_reference_id.as_deref(), Some("tree-sha"));
    assert_eq!(loaded.files["notes/a.md"].sha, "h1");
    assert_eq!(loaded.files["notes/a.md"].last_modified, 1_234);
}

#[tokio::test]
async fn test_persist_failure_propagates_as_storage_error() {
    let store = Arc::new(MemoryStore::default());
    store.fail_writes_to(common::STATE_PATH);
    let state_store = SyncStateStore::new(store, common::STATE_PATH);

    let err = state_store
        .persist(&SyncStateDocument::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::StorageFailure(_)));
}
