use async_trait::async_trait;

use super::error::StorageError;

/// Bucketed object storage with publicly reachable objects.
///
/// Paths are `/`-separated relative keys such as `2024/<uuid>.jpg`; see
/// [`validate_object_path`](super::validate_object_path).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `bucket/path`, replacing any existing object.
    ///
    /// Returns the object's public URL.
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Delete an object.
    ///
    /// Returns `true` if the object was deleted, `false` if it did not exist.
    async fn delete(&self, bucket: &str, path: &str) -> Result<bool, StorageError>;

    /// Public URL an object at `bucket/path` is (or would be) served from.
    fn public_url(&self, bucket: &str, path: &str) -> String;

    /// Inverse of [`public_url`](Self::public_url): the object path behind
    /// `url` if it was issued by this store for `bucket`.
    fn object_path_for_url(&self, bucket: &str, url: &str) -> Option<String> {
        let prefix = self.public_url(bucket, "");
        url.strip_prefix(&prefix)
            .filter(|path| !path.is_empty())
            .map(str::to_string)
    }
}

/// Join a base URL and an object key with exactly one `/` between them.
pub(crate) fn join_url(base: &str, bucket: &str, path: &str) -> String {
    format!("{}/{bucket}/{path}", base.trim_end_matches('/'))
}
