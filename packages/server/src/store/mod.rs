//! Record store adapters.
//!
//! Handlers only see the [`PaintingStore`] and [`SiteStore`] traits; the
//! database-backed implementations live in [`db`], the process-local ones in
//! [`memory`].

pub mod db;
pub mod memory;

use async_trait::async_trait;
use common::{PaintingRecord, RecordError};
use thiserror::Error;

use crate::models::site::{ArtistProfile, HomeSettings, SiteSettings};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
    /// A stored row could not be turned into a valid record.
    #[error("stored painting {id} is invalid: {source}")]
    InvalidRecord {
        id: String,
        #[source]
        source: RecordError,
    },
    #[error("stored setting '{key}' is malformed: {source}")]
    MalformedSetting {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Validate a record crossing the store boundary in either direction.
pub(crate) fn checked(record: PaintingRecord) -> Result<PaintingRecord, StoreError> {
    match record.validate() {
        Ok(()) => Ok(record),
        Err(source) => Err(StoreError::InvalidRecord {
            id: record.id,
            source,
        }),
    }
}

/// Storage of painting records.
#[async_trait]
pub trait PaintingStore: Send + Sync {
    /// All records, optionally restricted by the publish gate, sorted by
    /// `order` and then by creation time.
    async fn list(&self, published: Option<bool>) -> Result<Vec<PaintingRecord>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<PaintingRecord>, StoreError>;

    /// Insert or replace the record with `record.id`.
    async fn put(&self, record: &PaintingRecord) -> Result<(), StoreError>;

    /// Returns `true` if a record was deleted.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Sort weight for a newly created record: one past the current maximum.
    async fn next_order(&self) -> Result<i32, StoreError> {
        Ok(self
            .list(None)
            .await?
            .iter()
            .map(|r| r.order)
            .max()
            .map_or(0, |max| max.saturating_add(1)))
    }
}

/// Storage of the singleton site documents and the featured selection.
#[async_trait]
pub trait SiteStore: Send + Sync {
    async fn home_settings(&self) -> Result<HomeSettings, StoreError>;
    async fn put_home_settings(&self, settings: &HomeSettings) -> Result<(), StoreError>;

    async fn site_settings(&self) -> Result<SiteSettings, StoreError>;
    async fn put_site_settings(&self, settings: &SiteSettings) -> Result<(), StoreError>;

    async fn artist(&self) -> Result<ArtistProfile, StoreError>;
    async fn put_artist(&self, artist: &ArtistProfile) -> Result<(), StoreError>;

    /// Featured painting ids in curated order.
    async fn featured_ids(&self) -> Result<Vec<String>, StoreError>;
    async fn set_featured_ids(&self, ids: &[String]) -> Result<(), StoreError>;
}
