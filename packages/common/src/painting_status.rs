#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sale status of a painting.
///
/// Serialized as `FOR_SALE`, `CUSTOMIZABLE` or `SOLD`. Deserialization also
/// accepts the Chinese display labels used by older data snapshots.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
pub enum PaintingStatus {
    /// Available for purchase.
    #[serde(rename = "FOR_SALE", alias = "售卖中")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "FOR_SALE"))]
    ForSale,
    /// Commissions in this style are accepted.
    #[serde(rename = "CUSTOMIZABLE", alias = "可定制")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "CUSTOMIZABLE"))]
    Customizable,
    /// No longer available.
    #[serde(rename = "SOLD", alias = "已售出")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "SOLD"))]
    Sold,
}

impl PaintingStatus {
    /// All possible status values.
    pub const ALL: &'static [PaintingStatus] = &[Self::ForSale, Self::Customizable, Self::Sold];

    /// Returns the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForSale => "FOR_SALE",
            Self::Customizable => "CUSTOMIZABLE",
            Self::Sold => "SOLD",
        }
    }

    /// Returns the label shown to visitors.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ForSale => "售卖中",
            Self::Customizable => "可定制",
            Self::Sold => "已售出",
        }
    }
}

impl fmt::Display for PaintingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    invalid: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid status '{}'. Valid values: {}",
            self.invalid,
            PaintingStatus::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for PaintingStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        PaintingStatus::ALL
            .iter()
            .copied()
            .find(|status| {
                status.as_str().eq_ignore_ascii_case(trimmed) || status.label() == trimmed
            })
            .ok_or_else(|| ParseStatusError {
                invalid: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_upper_snake_case() {
        assert_eq!(
            serde_json::to_string(&PaintingStatus::ForSale).unwrap(),
            "\"FOR_SALE\""
        );
        assert_eq!(
            serde_json::to_string(&PaintingStatus::Customizable).unwrap(),
            "\"CUSTOMIZABLE\""
        );
    }

    #[test]
    fn deserializes_legacy_labels() {
        let parsed: PaintingStatus = serde_json::from_str("\"已售出\"").unwrap();
        assert_eq!(parsed, PaintingStatus::Sold);
        let parsed: PaintingStatus = serde_json::from_str("\"售卖中\"").unwrap();
        assert_eq!(parsed, PaintingStatus::ForSale);
    }

    #[test]
    fn from_str_accepts_literals_and_labels() {
        assert_eq!(
            "sold".parse::<PaintingStatus>().unwrap(),
            PaintingStatus::Sold
        );
        assert_eq!(
            " FOR_SALE ".parse::<PaintingStatus>().unwrap(),
            PaintingStatus::ForSale
        );
        assert_eq!(
            "可定制".parse::<PaintingStatus>().unwrap(),
            PaintingStatus::Customizable
        );
        let err = "AUCTION".parse::<PaintingStatus>().unwrap_err();
        assert!(err.to_string().contains("FOR_SALE, CUSTOMIZABLE, SOLD"));
    }
}
