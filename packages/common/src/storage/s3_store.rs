use async_trait::async_trait;
use s3::Bucket;
use s3::Region;
use s3::creds::Credentials;
use s3::error::S3Error;

use super::error::StorageError;
use super::traits::{ObjectStore, join_url};
use super::{validate_bucket, validate_object_path};

/// Connection settings for an S3-compatible endpoint.
#[derive(Clone, Debug)]
pub struct S3Settings {
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    /// Address buckets as `{endpoint}/{bucket}` instead of `{bucket}.{endpoint}`.
    pub path_style: bool,
    /// Base of public object URLs. Falls back to the endpoint when empty.
    pub public_base_url: String,
}

/// Object store backed by an S3-compatible service.
pub struct S3ObjectStore {
    settings: S3Settings,
    region: Region,
    credentials: Credentials,
}

impl S3ObjectStore {
    pub fn new(settings: S3Settings) -> Result<Self, StorageError> {
        let credentials = Credentials::new(
            Some(&settings.access_key),
            Some(&settings.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Backend(format!("invalid credentials: {e}")))?;
        let region = Region::Custom {
            region: settings.region.clone(),
            endpoint: settings.endpoint.clone(),
        };
        Ok(Self {
            settings,
            region,
            credentials,
        })
    }

    fn bucket(&self, name: &str) -> Result<Box<Bucket>, StorageError> {
        let bucket = Bucket::new(validate_bucket(name)?, self.region.clone(), self.credentials.clone())
            .map_err(backend)?;
        Ok(if self.settings.path_style {
            bucket.with_path_style()
        } else {
            bucket
        })
    }
}

fn backend(err: S3Error) -> StorageError {
    StorageError::Backend(err.to_string())
}

fn is_not_found(err: &S3Error) -> bool {
    matches!(err, S3Error::HttpFailWithBody(404, _))
}

fn check_status(code: u16, op: &str, bucket: &str, path: &str) -> Result<(), StorageError> {
    if (200..300).contains(&code) {
        Ok(())
    } else {
        Err(StorageError::Backend(format!(
            "{op} {bucket}/{path} returned HTTP {code}"
        )))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError> {
        let path = validate_object_path(path)?;
        let response = self
            .bucket(bucket)?
            .put_object_with_content_type(path, data, content_type)
            .await
            .map_err(backend)?;
        check_status(response.status_code(), "PUT", bucket, path)?;
        Ok(self.public_url(bucket, path))
    }

    async fn delete(&self, bucket: &str, path: &str) -> Result<bool, StorageError> {
        let path = validate_object_path(path)?;
        match self.bucket(bucket)?.delete_object(path).await {
            Ok(response) if response.status_code() == 404 => Ok(false),
            Ok(response) => {
                check_status(response.status_code(), "DELETE", bucket, path)?;
                Ok(true)
            }
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(backend(e)),
        }
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        let base = if self.settings.public_base_url.is_empty() {
            &self.settings.endpoint
        } else {
            &self.settings.public_base_url
        };
        join_url(base, bucket, path)
    }
}
