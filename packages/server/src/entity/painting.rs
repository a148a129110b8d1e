use common::PaintingStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "painting")]
pub struct Model {
    /// UUIDv7 for records created here; legacy snapshot ids are kept verbatim.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(indexed)]
    pub year: i32,
    pub dimensions: Option<String>,
    /// FOR_SALE, CUSTOMIZABLE or SOLD.
    #[sea_orm(indexed)]
    pub status: PaintingStatus,
    pub artist: Option<String>,

    pub image_url: String,
    pub thumbnail_url: String,

    #[sea_orm(default_value = false)]
    pub published: bool,
    pub sort_order: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
