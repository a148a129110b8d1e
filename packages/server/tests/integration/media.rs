use std::sync::Arc;

use ::common::config::{StorageBackend, StorageConfig};
use ::common::storage::filesystem::STAGING_DIR;
use reqwest::Client;

use server::state::AppState;
use server::store::memory::{MemoryPaintingStore, MemorySiteStore};

use crate::common::{ORIGINALS, THUMBNAILS, bind, serve, test_config};

#[tokio::test]
async fn filesystem_buckets_are_served_but_staging_is_not() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("media");
    let (listener, addr) = bind().await;

    let mut config = test_config();
    config.storage = StorageConfig {
        backend: StorageBackend::Filesystem,
        root: root.to_string_lossy().into_owned(),
        public_base_url: format!("http://{addr}/media"),
        ..Default::default()
    };
    let objects = ::common::storage::open(&config.storage).await.unwrap();
    let state = AppState::new(
        config,
        Arc::new(MemoryPaintingStore::new()),
        Arc::new(MemorySiteStore::new()),
        objects.clone(),
    );
    serve(listener, state);

    let client = Client::new();
    let original = objects
        .put(ORIGINALS, "2024/a.jpg", b"original", "image/jpeg")
        .await
        .unwrap();
    let thumbnail = objects
        .put(THUMBNAILS, "2024/a_thumb.jpg", b"thumb", "image/jpeg")
        .await
        .unwrap();

    for (url, body) in [(&original, "original"), (&thumbnail, "thumb")] {
        let res = client.get(url.as_str()).send().await.unwrap();
        assert_eq!(res.status(), 200, "{url}");
        assert_eq!(res.text().await.unwrap(), body);
    }

    std::fs::write(root.join(STAGING_DIR).join("partial"), b"half written").unwrap();
    let res = client
        .get(format!("http://{addr}/media/{STAGING_DIR}/partial"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
}
