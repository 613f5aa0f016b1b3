//! 磁盘存储测试

mod common;

use common::demo_service;
use flare_naming_client::cache::{DiskStore, PathStyle};
use flare_naming_client::model::Service;

#[tokio::test]
async fn test_save_then_load_returns_equal_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskStore::new(dir.path()).await.unwrap();
    let service = demo_service();

    store.save("DEFAULT_GROUP@@DEMO", &service).await.unwrap();
    let loaded = store.load("DEFAULT_GROUP@@DEMO").await;

    assert_eq!(loaded, Some(service));
}

#[tokio::test]
async fn test_load_missing_key_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskStore::new(dir.path()).await.unwrap();

    assert!(store.load("DEFAULT_GROUP@@NEVER_SAVED").await.is_none());
}

#[tokio::test]
async fn test_creates_cache_root() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("naming").join("public");
    assert!(!root.exists());

    let store = DiskStore::new(&root).await.unwrap();
    assert!(root.is_dir());
    assert_eq!(store.root(), root.as_path());
}

#[tokio::test]
async fn test_malformed_entry_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskStore::new(dir.path()).await.unwrap();
    std::fs::write(store.path_for("DEFAULT_GROUP@@BROKEN"), b"{not json").unwrap();

    assert!(store.load("DEFAULT_GROUP@@BROKEN").await.is_none());
}

#[tokio::test]
async fn test_unknown_format_version_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskStore::new(dir.path()).await.unwrap();
    let content = serde_json::json!({
        "version": 99,
        "key": "DEFAULT_GROUP@@DEMO",
        "service": demo_service(),
    });
    std::fs::write(
        store.path_for("DEFAULT_GROUP@@DEMO"),
        serde_json::to_vec(&content).unwrap(),
    )
    .unwrap();

    assert!(store.load("DEFAULT_GROUP@@DEMO").await.is_none());
}

#[tokio::test]
async fn test_save_overwrites_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskStore::new(dir.path()).await.unwrap();

    store.save("k", &demo_service()).await.unwrap();
    let empty = Service::new("DEFAULT_GROUP@@DEMO").with_checksum("empty");
    store.save("k", &empty).await.unwrap();

    let loaded = store.load("k").await.unwrap();
    assert!(loaded.hosts.is_empty());
    assert_eq!(loaded.checksum, "empty");
}

#[tokio::test]
async fn test_load_all_skips_tmp_and_malformed_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskStore::new(dir.path()).await.unwrap();

    store.save("DEFAULT_GROUP@@A", &Service::new("DEFAULT_GROUP@@A")).await.unwrap();
    store.save("DEFAULT_GROUP@@B", &Service::new("DEFAULT_GROUP@@B")).await.unwrap();
    std::fs::write(dir.path().join("DEFAULT_GROUP@@C.1.0.tmp"), b"partial").unwrap();
    std::fs::write(dir.path().join("garbage"), b"???").unwrap();
    std::fs::create_dir(dir.path().join("subdir")).unwrap();

    let mut keys: Vec<String> = store.load_all().await.into_iter().map(|(k, _)| k).collect();
    keys.sort();
    assert_eq!(keys, vec!["DEFAULT_GROUP@@A", "DEFAULT_GROUP@@B"]);
}

#[tokio::test]
async fn test_windows_style_file_name_round_trips_key() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskStore::with_style(dir.path(), PathStyle::Windows)
        .await
        .unwrap();
    let key = "nacos@@providers:org.example.UserProvider:hangzhou";

    store.save(key, &demo_service()).await.unwrap();

    assert!(
        dir.path()
            .join("nacos@@providers&&org.example.UserProvider&&hangzhou")
            .is_file()
    );
    let all = store.load_all().await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].0, key);
}

#[tokio::test]
async fn test_load_rejects_entry_saved_under_colliding_key() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskStore::with_style(dir.path(), PathStyle::Windows)
        .await
        .unwrap();
    let colon = Service::new("G@@a:b").with_checksum("colon");
    store.save("G@@a:b", &colon).await.unwrap();

    // 两个键落到同一个文件名
    assert_eq!(store.path_for("G@@a:b"), store.path_for("G@@a&&b"));
    assert!(store.load("G@@a&&b").await.is_none());
    assert_eq!(store.load("G@@a:b").await.unwrap().checksum, "colon");
}

#[tokio::test]
async fn test_concurrent_saves_for_different_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = std::sync::Arc::new(DiskStore::new(dir.path()).await.unwrap());

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let key = format!("DEFAULT_GROUP@@S{}", i);
            store.save(&key, &Service::new(key.clone())).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.load_all().await.len(), 8);
}
