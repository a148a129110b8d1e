use std::collections::HashMap;

use async_trait::async_trait;
use common::PaintingRecord;
use tokio::sync::RwLock;

use super::{PaintingStore, SiteStore, StoreError, checked};
use crate::models::site::{ArtistProfile, HomeSettings, SiteSettings};

/// Painting records held in process memory.
#[derive(Default)]
pub struct MemoryPaintingStore {
    records: RwLock<HashMap<String, PaintingRecord>>,
}

impl MemoryPaintingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `records` already stored.
    pub fn with_records(records: impl IntoIterator<Item = PaintingRecord>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().map(|r| (r.id.clone(), r)).collect()),
        }
    }
}

#[async_trait]
impl PaintingStore for MemoryPaintingStore {
    async fn list(&self, published: Option<bool>) -> Result<Vec<PaintingRecord>, StoreError> {
        let mut out: Vec<PaintingRecord> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| published.is_none_or(|p| r.published == p))
            .cloned()
            .map(checked)
            .collect::<Result<_, _>>()?;
        out.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then(a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(out)
    }

    async fn get(&self, id: &str) -> Result<Option<PaintingRecord>, StoreError> {
        self.records.read().await.get(id).cloned().map(checked).transpose()
    }

    async fn put(&self, record: &PaintingRecord) -> Result<(), StoreError> {
        let record = checked(record.clone())?;
        self.records.write().await.insert(record.id.clone(), record);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.records.write().await.remove(id).is_some())
    }
}

#[derive(Default)]
struct SiteDocuments {
    home: HomeSettings,
    site: SiteSettings,
    artist: ArtistProfile,
    featured: Vec<String>,
}

/// Site documents held in process memory, starting from the defaults.
#[derive(Default)]
pub struct MemorySiteStore {
    docs: RwLock<SiteDocuments>,
}

impl MemorySiteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SiteStore for MemorySiteStore {
    async fn home_settings(&self) -> Result<HomeSettings, StoreError> {
        Ok(self.docs.read().await.home.clone())
    }

    async fn put_home_settings(&self, settings: &HomeSettings) -> Result<(), StoreError> {
        self.docs.write().await.home = settings.clone();
        Ok(())
    }

    async fn site_settings(&self) -> Result<SiteSettings, StoreError> {
        Ok(self.docs.read().await.site.clone())
    }

    async fn put_site_settings(&self, settings: &SiteSettings) -> Result<(), StoreError> {
        self.docs.write().await.site = settings.clone();
        Ok(())
    }

    async fn artist(&self) -> Result<ArtistProfile, StoreError> {
        Ok(self.docs.read().await.artist.clone())
    }

    async fn put_artist(&self, artist: &ArtistProfile) -> Result<(), StoreError> {
        self.docs.write().await.artist = artist.clone();
        Ok(())
    }

    async fn featured_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.docs.read().await.featured.clone())
    }

    async fn set_featured_ids(&self, ids: &[String]) -> Result<(), StoreError> {
        self.docs.write().await.featured = ids.to_vec();
        Ok(())
    }
}
