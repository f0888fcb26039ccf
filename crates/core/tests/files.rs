//! In-memory file store tests.

use gridchat_core::{FileStatus, FileStore, MemoryStore};

#[tokio::test]
async fn upload_and_read_back() {
    let store = MemoryStore::new();
    let info = store
        .upload("sales.csv", b"month,total\njan,42\n".to_vec())
        .await
        .unwrap();

    assert_eq!(info.filename, "sales.csv");
    assert_eq!(info.bytes, 19);
    assert_eq!(info.status, FileStatus::Ready);

    let fetched = store.get(&info.id).await.unwrap();
    assert_eq!(fetched.id, info.id);

    let content = store.content(&info.id).await.unwrap();
    assert!(content.starts_with("month,total"));
}

#[tokio::test]
async fn list_returns_all_files() {
    let store = MemoryStore::new();
    store.upload("a.csv", b"a".to_vec()).await.unwrap();
    store.upload("b.csv", b"b".to_vec()).await.unwrap();
    assert_eq!(store.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn delete_removes_file() {
    let store = MemoryStore::new();
    let info = store.upload("a.csv", b"a".to_vec()).await.unwrap();
    store.delete(&info.id).await.unwrap();
    assert!(store.get(&info.id).await.is_err());
    assert!(store.delete(&info.id).await.is_err());
}

#[tokio::test]
async fn missing_file_errors() {
    let store = MemoryStore::new();
    let err = store.get("nope").await.unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn non_utf8_content_errors() {
    let store = MemoryStore::new();
    let info = store.upload("blob.xlsx", vec![0xff, 0xfe, 0x00]).await.unwrap();
    let err = store.content(&info.id).await.unwrap_err();
    assert!(err.to_string().contains("not valid UTF-8"));
}
