use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const HOME_KEY: &str = "home";
pub const SITE_KEY: &str = "site";

/// A named JSON settings document.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "site_setting")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,

    #[sea_orm(column_type = "JsonBinary")]
    pub value: serde_json::Value,

    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
