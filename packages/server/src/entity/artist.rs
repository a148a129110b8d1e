use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Primary key of the single artist row.
pub const ARTIST_ID: i32 = 1;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artist")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    pub name: String,
    pub title: String,
    pub avatar_url: String,
    #[sea_orm(column_type = "Text")]
    pub bio: String,

    /// Career timeline as JSON array: [{year, title, description?}]
    #[sea_orm(column_type = "JsonBinary")]
    pub timeline: serde_json::Value,

    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
