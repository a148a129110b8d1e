use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::StorageError;
use super::traits::{ObjectStore, join_url};
use super::{validate_bucket, validate_object_path};

/// A stored object and the content type it was written with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Process-local object store for tests and ephemeral deployments.
///
/// Writes to a bucket registered with [`fail_writes_to`](Self::fail_writes_to)
/// return a backend error, which lets callers exercise partial-failure paths.
pub struct MemoryObjectStore {
    public_base_url: String,
    objects: RwLock<BTreeMap<(String, String), StoredObject>>,
    failing_buckets: RwLock<HashSet<String>>,
}

impl MemoryObjectStore {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into(),
            objects: RwLock::new(BTreeMap::new()),
            failing_buckets: RwLock::new(HashSet::new()),
        }
    }

    /// Make every subsequent `put` into `bucket` fail.
    pub async fn fail_writes_to(&self, bucket: &str) {
        self.failing_buckets.write().await.insert(bucket.to_string());
    }

    /// Object keys currently stored, as `(bucket, path)` pairs in sorted order.
    pub async fn keys(&self) -> Vec<(String, String)> {
        self.objects.read().await.keys().cloned().collect()
    }

    pub async fn object(&self, bucket: &str, path: &str) -> Option<StoredObject> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), path.to_string()))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError> {
        validate_bucket(bucket)?;
        validate_object_path(path)?;
        if self.failing_buckets.read().await.contains(bucket) {
            return Err(StorageError::Backend(format!(
                "bucket {bucket} is rejecting writes"
            )));
        }
        self.objects.write().await.insert(
            (bucket.to_string(), path.to_string()),
            StoredObject {
                data: data.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(self.public_url(bucket, path))
    }

    async fn delete(&self, bucket: &str, path: &str) -> Result<bool, StorageError> {
        Ok(self
            .objects
            .write()
            .await
            .remove(&(bucket.to_string(), path.to_string()))
            .is_some())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        join_url(&self.public_base_url, bucket, path)
    }
}
