//! Tests for the filesystem vault adapter
//!
//! These use a real temporary directory.

use gitvault_core::ports::local_store::ILocalStore;
use gitvault_sync::vault::VaultStore;

fn vault() -> (tempfile::TempDir, VaultStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = VaultStore::new(dir.path());
    (dir, store)
}

#[tokio::test]
async fn test_write_read_roundtrip_with_nested_dirs() {
    let (_dir, store) = vault();

    store
        .write("notes/daily/2026-08-07.md", b"# Today\n")
        .await
        .expect("write failed");

    let data = store.read("notes/daily/2026-08-07.md").await.unwrap();
    assert_eq!(data, b"# Today\n");
    assert!(store.exists("notes/daily/2026-08-07.md").await.unwrap());
}

#[tokio::test]
async fn test_text_write_rejects_invalid_utf8() {
    let (_dir, store) = vault();

    let err = store.write("note.md", &[0xff, 0xfe, 0x00]).await.unwrap_err();
    assert!(err.to_string().contains("UTF-8"));
    assert!(!store.exists("note.md").await.unwrap());
}

#[tokio::test]
async fn test_binary_write_accepts_any_bytes() {
    let (_dir, store) = vault();

    store
        .write("attachments/img.png", &[0x89, b'P', b'N', b'G', 0x00, 0xff])
        .await
        .expect("binary write failed");

    let data = store.read("attachments/img.png").await.unwrap();
    assert_eq!(data.len(), 6);
}

#[tokio::test]
async fn test_delete_reports_whether_file_existed() {
    let (_dir, store) = vault();

    store.write("a.md", b"x").await.unwrap();
    assert!(store.delete("a.md").await.unwrap());
    assert!(!store.delete("a.md").await.unwrap());
    assert!(!store.delete("never-existed.md").await.unwrap());
}

#[tokio::test]
async fn test_write_replaces_existing_content() {
    let (_dir, store) = vault();

    store.write("a.md", b"old").await.unwrap();
    store.write("a.md", b"new").await.unwrap();
    assert_eq!(store.read("a.md").await.unwrap(), b"new");
}

#[tokio::test]
async fn test_write_leaves_no_temp_files() {
    let (dir, store) = vault();

    store.write("a.md", b"content").await.unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.md".to_string()]);
}

#[tokio::test]
async fn test_traversal_is_rejected() {
    let (_dir, store) = vault();

    assert!(store.write("../escape.md", b"x").await.is_err());
    assert!(store.read("/etc/hostname").await.is_err());
}
