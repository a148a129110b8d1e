use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One slot of the curated home page selection.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "featured_painting")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub position: i32,

    pub painting_id: String,
}

impl ActiveModelBehavior for ActiveModel {}
