use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::traits::{ObjectStore, join_url};
use super::{validate_bucket, validate_object_path};

/// Directory under the root where writes are staged before the final rename.
/// Only bucket directories may be served publicly, never this one.
pub const STAGING_DIR: &str = ".tmp";

/// Filesystem-backed object store.
///
/// Objects live at `{root}/{bucket}/{path}`; the root is expected to be served
/// statically under `public_base_url`.
pub struct FilesystemObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl FilesystemObjectStore {
    /// Create a new filesystem object store.
    pub async fn new(root: PathBuf, public_base_url: impl Into<String>) -> Result<Self, StorageError> {
        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join(STAGING_DIR)).await?;
        Ok(Self {
            root,
            public_base_url: public_base_url.into(),
        })
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Compute the filesystem path for an object, rejecting unsafe keys.
    fn object_path(&self, bucket: &str, path: &str) -> Result<PathBuf, StorageError> {
        let bucket = validate_bucket(bucket)?;
        let path = validate_object_path(path)?;
        Ok(self.root.join(bucket).join(path))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.root.join(STAGING_DIR).join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        data: &[u8],
        _content_type: &str,
    ) -> Result<String, StorageError> {
        let object_path = self.object_path(bucket, path)?;

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = object_path.parent()
            && let Err(e) = fs::create_dir_all(parent).await
        {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, &object_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(self.public_url(bucket, path))
    }

    async fn delete(&self, bucket: &str, path: &str) -> Result<bool, StorageError> {
        let object_path = self.object_path(bucket, path)?;
        match fs::remove_file(&object_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        join_url(&self.public_base_url, bucket, path)
    }
}
