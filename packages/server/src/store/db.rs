use async_trait::async_trait;
use chrono::Utc;
use common::PaintingRecord;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{PaintingStore, SiteStore, StoreError};
use crate::entity::{artist, featured_painting, painting, site_setting};
use crate::models::site::{ArtistProfile, HomeSettings, SiteSettings, TimelineEntry};

/// Convert a row into a record, validating it on the way out.
pub fn record_from_model(model: painting::Model) -> Result<PaintingRecord, StoreError> {
    let record = PaintingRecord {
        id: model.id,
        title: model.title,
        description: model.description,
        year: model.year,
        dimensions: model.dimensions,
        status: model.status,
        artist: model.artist,
        image_url: model.image_url,
        thumbnail_url: model.thumbnail_url,
        published: model.published,
        order: model.sort_order,
        created_at: model.created_at,
        updated_at: model.updated_at,
    };
    super::checked(record)
}

fn active_from_record(record: &PaintingRecord) -> painting::ActiveModel {
    painting::ActiveModel {
        id: Set(record.id.clone()),
        title: Set(record.title.clone()),
        description: Set(record.description.clone()),
        year: Set(record.year),
        dimensions: Set(record.dimensions.clone()),
        status: Set(record.status),
        artist: Set(record.artist.clone()),
        image_url: Set(record.image_url.clone()),
        thumbnail_url: Set(record.thumbnail_url.clone()),
        published: Set(record.published),
        sort_order: Set(record.order),
        created_at: Set(record.created_at),
        updated_at: Set(record.updated_at),
    }
}

/// Painting records in the relational database.
#[derive(Clone)]
pub struct DbPaintingStore {
    db: DatabaseConnection,
}

impl DbPaintingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaintingStore for DbPaintingStore {
    async fn list(&self, published: Option<bool>) -> Result<Vec<PaintingRecord>, StoreError> {
        let mut select = painting::Entity::find();
        if let Some(published) = published {
            select = select.filter(painting::Column::Published.eq(published));
        }
        select
            .order_by_asc(painting::Column::SortOrder)
            .order_by_asc(painting::Column::CreatedAt)
            .order_by_asc(painting::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(record_from_model)
            .collect()
    }

    async fn get(&self, id: &str) -> Result<Option<PaintingRecord>, StoreError> {
        painting::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(record_from_model)
            .transpose()
    }

    async fn put(&self, record: &PaintingRecord) -> Result<(), StoreError> {
        record.validate().map_err(|source| StoreError::InvalidRecord {
            id: record.id.clone(),
            source,
        })?;

        painting::Entity::insert(active_from_record(record))
            .on_conflict(
                OnConflict::column(painting::Column::Id)
                    .update_columns([
                        painting::Column::Title,
                        painting::Column::Description,
                        painting::Column::Year,
                        painting::Column::Dimensions,
                        painting::Column::Status,
                        painting::Column::Artist,
                        painting::Column::ImageUrl,
                        painting::Column::ThumbnailUrl,
                        painting::Column::Published,
                        painting::Column::SortOrder,
                        painting::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let txn = self.db.begin().await?;
        featured_painting::Entity::delete_many()
            .filter(featured_painting::Column::PaintingId.eq(id))
            .exec(&txn)
            .await?;
        let result = painting::Entity::delete_by_id(id.to_string())
            .exec(&txn)
            .await?;
        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    async fn next_order(&self) -> Result<i32, StoreError> {
        let max_order: Option<i32> = painting::Entity::find()
            .select_only()
            .column_as(painting::Column::SortOrder.max(), "max_order")
            .into_tuple::<Option<i32>>()
            .one(&self.db)
            .await?
            .flatten();
        Ok(max_order.map_or(0, |max| max.saturating_add(1)))
    }
}

/// Site documents, artist profile and featured selection in the database.
#[derive(Clone)]
pub struct DbSiteStore {
    db: DatabaseConnection,
}

impl DbSiteStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load_setting<T: DeserializeOwned + Default>(
        &self,
        key: &'static str,
    ) -> Result<T, StoreError> {
        match site_setting::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await?
        {
            Some(row) => serde_json::from_value(row.value)
                .map_err(|source| StoreError::MalformedSetting { key, source }),
            None => Ok(T::default()),
        }
    }

    async fn store_setting<T: Serialize>(
        &self,
        key: &'static str,
        value: &T,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)
            .map_err(|source| StoreError::MalformedSetting { key, source })?;
        let model = site_setting::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value),
            updated_at: Set(Utc::now()),
        };
        site_setting::Entity::insert(model)
            .on_conflict(
                OnConflict::column(site_setting::Column::Key)
                    .update_columns([site_setting::Column::Value, site_setting::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SiteStore for DbSiteStore {
    async fn home_settings(&self) -> Result<HomeSettings, StoreError> {
        self.load_setting(site_setting::HOME_KEY).await
    }

    async fn put_home_settings(&self, settings: &HomeSettings) -> Result<(), StoreError> {
        self.store_setting(site_setting::HOME_KEY, settings).await
    }

    async fn site_settings(&self) -> Result<SiteSettings, StoreError> {
        self.load_setting(site_setting::SITE_KEY).await
    }

    async fn put_site_settings(&self, settings: &SiteSettings) -> Result<(), StoreError> {
        self.store_setting(site_setting::SITE_KEY, settings).await
    }

    async fn artist(&self) -> Result<ArtistProfile, StoreError> {
        let Some(row) = artist::Entity::find_by_id(artist::ARTIST_ID)
            .one(&self.db)
            .await?
        else {
            return Ok(ArtistProfile::default());
        };
        let timeline: Vec<TimelineEntry> = serde_json::from_value(row.timeline).map_err(
            |source| StoreError::MalformedSetting {
                key: "artist.timeline",
                source,
            },
        )?;
        Ok(ArtistProfile {
            name: row.name,
            title: row.title,
            avatar_url: row.avatar_url,
            bio: row.bio,
            timeline,
        })
    }

    async fn put_artist(&self, profile: &ArtistProfile) -> Result<(), StoreError> {
        let timeline = serde_json::to_value(&profile.timeline).map_err(|source| {
            StoreError::MalformedSetting {
                key: "artist.timeline",
                source,
            }
        })?;
        let model = artist::ActiveModel {
            id: Set(artist::ARTIST_ID),
            name: Set(profile.name.clone()),
            title: Set(profile.title.clone()),
            avatar_url: Set(profile.avatar_url.clone()),
            bio: Set(profile.bio.clone()),
            timeline: Set(timeline),
            updated_at: Set(Utc::now()),
        };
        artist::Entity::insert(model)
            .on_conflict(
                OnConflict::column(artist::Column::Id)
                    .update_columns([
                        artist::Column::Name,
                        artist::Column::Title,
                        artist::Column::AvatarUrl,
                        artist::Column::Bio,
                        artist::Column::Timeline,
                        artist::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn featured_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(featured_painting::Entity::find()
            .order_by_asc(featured_painting::Column::Position)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| row.painting_id)
            .collect())
    }

    async fn set_featured_ids(&self, ids: &[String]) -> Result<(), StoreError> {
        let txn = self.db.begin().await?;
        featured_painting::Entity::delete_many().exec(&txn).await?;
        for (position, id) in ids.iter().enumerate() {
            featured_painting::ActiveModel {
                position: Set(i32::try_from(position).unwrap_or(i32::MAX)),
                painting_id: Set(id.clone()),
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;
        Ok(())
    }
}
