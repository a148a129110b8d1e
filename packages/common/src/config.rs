use serde::Deserialize;

use crate::derivative::{DerivativeConfig, DerivativePipeline};

/// Which [`ObjectStore`](crate::storage::ObjectStore) implementation to use.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Filesystem,
    S3,
    /// Process-local; contents are lost on restart.
    Memory,
}

/// Credentials and endpoint for the `s3` backend.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct S3Config {
    pub endpoint: String,
    #[serde(default = "default_s3_region")]
    pub region: String,
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: String,
    /// Default: true (MinIO and most self-hosted services need it).
    #[serde(default = "default_true")]
    pub path_style: bool,
}

/// Object storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Root directory of the filesystem backend. Default: "./data/media".
    #[serde(default = "default_storage_root")]
    pub root: String,
    /// Base URL objects are publicly served from. Default: "http://localhost:3000/media".
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Bucket for normalized originals. Default: "paintings".
    #[serde(default = "default_originals_bucket")]
    pub originals_bucket: String,
    /// Bucket for thumbnails. Default: "paintings-thumbnails".
    #[serde(default = "default_thumbnails_bucket")]
    pub thumbnails_bucket: String,
    #[serde(default)]
    pub s3: Option<S3Config>,
}

fn default_true() -> bool {
    true
}
fn default_s3_region() -> String {
    "us-east-1".into()
}
fn default_storage_root() -> String {
    "./data/media".into()
}
fn default_public_base_url() -> String {
    "http://localhost:3000/media".into()
}
fn default_originals_bucket() -> String {
    "paintings".into()
}
fn default_thumbnails_bucket() -> String {
    "paintings-thumbnails".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            root: default_storage_root(),
            public_base_url: default_public_base_url(),
            originals_bucket: default_originals_bucket(),
            thumbnails_bucket: default_thumbnails_bucket(),
            s3: None,
        }
    }
}

impl StorageConfig {
    pub fn buckets(&self) -> crate::ingest::Buckets {
        crate::ingest::Buckets {
            originals: self.originals_bucket.clone(),
            thumbnails: self.thumbnails_bucket.clone(),
        }
    }
}

/// Upload limits and derivative encoding settings.
#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Largest accepted upload in bytes. Default: 10 MiB.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Default: 400.
    #[serde(default = "default_thumbnail_width")]
    pub thumbnail_width: u32,
    /// Default: 80.
    #[serde(default = "default_thumbnail_quality")]
    pub thumbnail_quality: u8,
    /// Default: 90.
    #[serde(default = "default_original_quality")]
    pub original_quality: u8,
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}
fn default_thumbnail_width() -> u32 {
    400
}
fn default_thumbnail_quality() -> u8 {
    80
}
fn default_original_quality() -> u8 {
    90
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            thumbnail_width: default_thumbnail_width(),
            thumbnail_quality: default_thumbnail_quality(),
            original_quality: default_original_quality(),
        }
    }
}

impl UploadConfig {
    pub fn pipeline(&self) -> DerivativePipeline {
        DerivativePipeline {
            max_input_bytes: self.max_file_size,
            original_quality: self.original_quality,
            thumbnail: DerivativeConfig {
                max_width: self.thumbnail_width,
                quality: self.thumbnail_quality,
            },
        }
    }
}

/// Listing page sizes.
#[derive(Debug, Deserialize, Clone)]
pub struct GalleryConfig {
    /// Public page size. Default: 12.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Admin page size. Default: 20.
    #[serde(default = "default_admin_page_size")]
    pub admin_page_size: u64,
    /// Upper bound for a client-requested `per_page`. Default: 100.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

fn default_page_size() -> u64 {
    12
}
fn default_admin_page_size() -> u64 {
    20
}
fn default_max_page_size() -> u64 {
    100
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            admin_page_size: default_admin_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl GalleryConfig {
    /// Resolve a requested page size against `fallback` and the configured cap.
    pub fn page_size_for(&self, requested: Option<u64>, fallback: u64) -> u64 {
        requested
            .filter(|n| *n > 0)
            .unwrap_or(fallback)
            .clamp(1, self.max_page_size.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_defaults_build_standard_pipeline() {
        let pipeline = UploadConfig::default().pipeline();
        assert_eq!(pipeline, DerivativePipeline::default());
    }

    #[test]
    fn storage_config_deserializes_with_defaults() {
        let cfg: StorageConfig = serde_json::from_str(r#"{"backend":"s3","s3":{"endpoint":"http://minio:9000"}}"#).unwrap();
        assert_eq!(cfg.backend, StorageBackend::S3);
        assert_eq!(cfg.originals_bucket, "paintings");
        assert_eq!(cfg.thumbnails_bucket, "paintings-thumbnails");
        let s3 = cfg.s3.unwrap();
        assert!(s3.path_style);
        assert_eq!(s3.region, "us-east-1");
    }

    #[test]
    fn page_size_is_capped() {
        let cfg = GalleryConfig::default();
        assert_eq!(cfg.page_size_for(None, 12), 12);
        assert_eq!(cfg.page_size_for(Some(0), 12), 12);
        assert_eq!(cfg.page_size_for(Some(30), 12), 30);
        assert_eq!(cfg.page_size_for(Some(5000), 12), 100);
    }
}
