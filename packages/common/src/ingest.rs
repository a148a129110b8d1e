//! Upload ingestion: validate, derive, then persist original and thumbnail.
//!
//! The original must be stored for the upload to succeed. A failed thumbnail
//! write is tolerated and the original's URL is served in its place.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::derivative::{DerivativeError, DerivativePipeline, OUTPUT_CONTENT_TYPE, OUTPUT_EXTENSION};
use crate::painting::{RecordError, validate_year};
use crate::storage::{ObjectStore, StorageError};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Rejected(#[from] DerivativeError),
    #[error(transparent)]
    InvalidYear(#[from] RecordError),
    #[error("Failed to store original image: {0}")]
    Storage(#[source] StorageError),
    #[error("Image processing task failed: {0}")]
    Worker(String),
}

/// Where originals and thumbnails are written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Buckets {
    pub originals: String,
    pub thumbnails: String,
}

impl Default for Buckets {
    fn default() -> Self {
        Self {
            originals: "paintings".into(),
            thumbnails: "paintings-thumbnails".into(),
        }
    }
}

/// Storage keys for one upload, grouped by year.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetKeys {
    pub original: String,
    pub thumbnail: String,
}

impl AssetKeys {
    /// Fresh collision-resistant keys: `<year>/<uuid>.jpg` and `<year>/<uuid>_thumb.jpg`.
    pub fn generate(year: i32) -> Self {
        let id = uuid::Uuid::new_v4();
        Self {
            original: format!("{year}/{id}.{OUTPUT_EXTENSION}"),
            thumbnail: format!("{year}/{id}_thumb.{OUTPUT_EXTENSION}"),
        }
    }
}

/// Result returned to the uploader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    #[schema(example = "https://cdn.example.com/paintings/2024/0b9c6a1e.jpg")]
    pub image_url: String,
    /// Equals `image_url` when the thumbnail could not be stored.
    #[schema(example = "https://cdn.example.com/paintings-thumbnails/2024/0b9c6a1e_thumb.jpg")]
    pub thumbnail_url: String,
    /// Original width in pixels.
    pub width: u32,
    /// Original height in pixels.
    pub height: u32,
    /// Byte length of the stored original.
    pub size: u64,
}

/// Everything needed to turn uploaded bytes into stored assets.
#[derive(Clone, Debug)]
pub struct Ingestor {
    pub pipeline: DerivativePipeline,
    pub buckets: Buckets,
}

impl Ingestor {
    pub fn new(pipeline: DerivativePipeline, buckets: Buckets) -> Self {
        Self { pipeline, buckets }
    }

    /// Process `bytes` and write both assets under `year`.
    ///
    /// Every validation happens before the first storage write.
    pub async fn ingest(
        &self,
        store: &dyn ObjectStore,
        bytes: Vec<u8>,
        declared_type: Option<&str>,
        year: i32,
    ) -> Result<UploadResult, IngestError> {
        validate_year(year)?;
        if let Some(declared) = declared_type {
            self.pipeline.check_declared_type(declared)?;
        }
        self.pipeline.check_size(bytes.len() as u64)?;

        let pipeline = self.pipeline;
        let declared = declared_type.map(str::to_string);
        let processed = tokio::task::spawn_blocking(move || pipeline.process(&bytes, declared.as_deref()))
            .await
            .map_err(|e| IngestError::Worker(e.to_string()))??;

        let keys = AssetKeys::generate(year);
        let original = &processed.original;

        let image_url = store
            .put(&self.buckets.originals, &keys.original, &original.bytes, OUTPUT_CONTENT_TYPE)
            .await
            .map_err(IngestError::Storage)?;

        let thumbnail_url = match store
            .put(
                &self.buckets.thumbnails,
                &keys.thumbnail,
                &processed.thumbnail.bytes,
                OUTPUT_CONTENT_TYPE,
            )
            .await
        {
            Ok(url) => url,
            Err(e) => {
                warn!(
                    error = %e,
                    key = %keys.thumbnail,
                    "Thumbnail write failed, serving original in its place"
                );
                image_url.clone()
            }
        };

        info!(
            key = %keys.original,
            width = original.width,
            height = original.height,
            size = original.bytes.len(),
            source = processed.source_format.mime(),
            "Stored uploaded image"
        );

        Ok(UploadResult {
            image_url,
            thumbnail_url,
            width: original.width,
            height: original.height,
            size: original.bytes.len() as u64,
        })
    }
}
