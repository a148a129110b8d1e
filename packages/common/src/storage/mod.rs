mod error;
mod traits;

pub mod filesystem;
pub mod memory;
#[cfg(feature = "object-storage")]
pub mod s3_store;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{StorageBackend, StorageConfig};

pub use error::StorageError;
pub use traits::ObjectStore;

/// Build the object store selected by `config.backend`.
pub async fn open(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, StorageError> {
    match config.backend {
        StorageBackend::Filesystem => {
            let store =
                filesystem::FilesystemObjectStore::new(PathBuf::from(&config.root), &config.public_base_url)
                    .await?;
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => Ok(Arc::new(memory::MemoryObjectStore::new(
            &config.public_base_url,
        ))),
        #[cfg(feature = "object-storage")]
        StorageBackend::S3 => {
            let s3 = config
                .s3
                .as_ref()
                .ok_or_else(|| StorageError::Backend("storage.s3 section is missing".into()))?;
            let store = s3_store::S3ObjectStore::new(s3_store::S3Settings {
                endpoint: s3.endpoint.clone(),
                region: s3.region.clone(),
                access_key: s3.access_key.clone(),
                secret_key: s3.secret_key.clone(),
                path_style: s3.path_style,
                public_base_url: config.public_base_url.clone(),
            })?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "object-storage"))]
        StorageBackend::S3 => Err(StorageError::Backend(
            "built without the object-storage feature".into(),
        )),
    }
}

/// Maximum accepted object path length in bytes.
pub const MAX_PATH_LEN: usize = 512;

fn contains_path_traversal(path: &str) -> bool {
    path == ".."
        || path.starts_with("../")
        || path.contains("/../")
        || path.ends_with("/..")
}

/// Validates a relative object path (`year/name.jpg`).
///
/// Segments must be non-empty, must not start with `.`, and may only use
/// `a-zA-Z0-9`, `-`, `_` and `.`.
pub fn validate_object_path(path: &str) -> Result<&str, StorageError> {
    if path.is_empty() {
        return Err(StorageError::InvalidPath("path cannot be empty"));
    }
    if path.len() > MAX_PATH_LEN {
        return Err(StorageError::InvalidPath(
            "path exceeds maximum length of 512 bytes",
        ));
    }
    if path.contains('\\') || path.contains('\0') {
        return Err(StorageError::InvalidPath(
            "path must not contain backslashes or null bytes",
        ));
    }
    if path.starts_with('/') || path.ends_with('/') {
        return Err(StorageError::InvalidPath(
            "path must not start or end with '/'",
        ));
    }
    if contains_path_traversal(path) {
        return Err(StorageError::InvalidPath("path must not contain '..'"));
    }
    for segment in path.split('/') {
        if segment.is_empty() {
            return Err(StorageError::InvalidPath(
                "path must not contain empty segments",
            ));
        }
        if segment.starts_with('.') {
            return Err(StorageError::InvalidPath(
                "path segments must not start with '.'",
            ));
        }
    }
    if !path
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.'))
    {
        return Err(StorageError::InvalidPath(
            "path contains invalid characters (allowed: a-zA-Z0-9, /, -, _, .)",
        ));
    }
    Ok(path)
}

/// Validates a bucket name: a single lowercase path segment.
pub fn validate_bucket(bucket: &str) -> Result<&str, StorageError> {
    let valid = !bucket.is_empty()
        && bucket.len() <= 63
        && !bucket.starts_with(['.', '-'])
        && bucket
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.'));
    if !valid {
        return Err(StorageError::InvalidPath(
            "bucket must be 1-63 chars of a-z, 0-9, '-', '.'",
        ));
    }
    Ok(bucket)
}
