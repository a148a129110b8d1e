use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::*;
use tracing::{info, warn};

use crate::entity::{artist, painting, site_setting};
use crate::models::site::{ArtistProfile, HomeSettings, SiteSettings};
use crate::store::db::DbSiteStore;
use crate::store::{SiteStore, StoreError};

/// Write the default site documents and artist profile if they are absent.
/// Existing rows are never overwritten.
pub async fn seed_defaults(db: &DatabaseConnection) -> Result<(), StoreError> {
    let store = DbSiteStore::new(db.clone());
    let mut seeded = 0u32;

    if site_setting::Entity::find_by_id(site_setting::HOME_KEY.to_string())
        .one(db)
        .await?
        .is_none()
    {
        store.put_home_settings(&HomeSettings::default()).await?;
        seeded += 1;
    }

    if site_setting::Entity::find_by_id(site_setting::SITE_KEY.to_string())
        .one(db)
        .await?
        .is_none()
    {
        store.put_site_settings(&SiteSettings::default()).await?;
        seeded += 1;
    }

    if artist::Entity::find_by_id(artist::ARTIST_ID)
        .one(db)
        .await?
        .is_none()
    {
        store.put_artist(&ArtistProfile::default()).await?;
        seeded += 1;
    }

    if seeded > 0 {
        info!("Seeded {} default site documents", seeded);
    }

    Ok(())
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Public listing: WHERE published = true ORDER BY sort_order
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_painting_published_order")
        .table(painting::Entity)
        .col(painting::Column::Published)
        .col(painting::Column::SortOrder)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_painting_published_order exists");
        }
        Err(e) => {
            warn!("Failed to create index idx_painting_published_order: {}", e);
        }
    }

    Ok(())
}
