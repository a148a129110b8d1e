use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::PaintingStatus;

/// Earliest accepted creation year.
pub const YEAR_MIN: i32 = 1900;
/// Latest accepted creation year.
pub const YEAR_MAX: i32 = 2100;

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 5000;
pub const DIMENSIONS_MAX_CHARS: usize = 50;

/// One painting's metadata as held by the record store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaintingRecord {
    /// Opaque, immutable identifier.
    #[schema(example = "0193b1c2-5d2e-7c41-9a51-3f0d9b7e1a20")]
    pub id: String,
    #[schema(example = "山水")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[schema(example = 2023)]
    pub year: i32,
    /// Physical size, e.g. `68x136 cm`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    pub status: PaintingStatus,
    /// Credited artist, when it differs from the site's artist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    pub image_url: String,
    pub thumbnail_url: String,
    /// Unpublished records never appear in public listings.
    #[serde(default)]
    pub published: bool,
    /// Manual sort weight; lower sorts first.
    #[serde(default)]
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reasons a painting record (or a candidate for one) is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Painting id must not be empty")]
    EmptyId,
    #[error("Title must be 1-100 characters")]
    InvalidTitle,
    #[error("Description must be at most 5000 characters")]
    DescriptionTooLong,
    #[error("Year {0} is outside 1900-2100")]
    YearOutOfRange(i32),
    #[error("Dimensions must be at most 50 characters")]
    DimensionsTooLong,
    #[error("{0} must not be empty")]
    MissingUrl(&'static str),
    #[error("{0} must be an absolute http(s) URL")]
    InvalidUrl(&'static str),
    #[error("Malformed painting record: {0}")]
    Malformed(String),
}

impl PaintingRecord {
    /// Check the invariants every stored record must satisfy.
    ///
    /// Asset URLs only need to be present here; legacy records carry
    /// site-relative paths.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.id.trim().is_empty() {
            return Err(RecordError::EmptyId);
        }
        validate_title(&self.title)?;
        validate_description(&self.description)?;
        validate_year(self.year)?;
        validate_dimensions(self.dimensions.as_deref())?;
        if self.image_url.trim().is_empty() {
            return Err(RecordError::MissingUrl("imageUrl"));
        }
        if self.thumbnail_url.trim().is_empty() {
            return Err(RecordError::MissingUrl("thumbnailUrl"));
        }
        Ok(())
    }
}

/// Validate a trimmed title (1-100 Unicode characters).
pub fn validate_title(title: &str) -> Result<(), RecordError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > TITLE_MAX_CHARS {
        return Err(RecordError::InvalidTitle);
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), RecordError> {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(RecordError::DescriptionTooLong);
    }
    Ok(())
}

pub fn validate_year(year: i32) -> Result<(), RecordError> {
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return Err(RecordError::YearOutOfRange(year));
    }
    Ok(())
}

pub fn validate_dimensions(dimensions: Option<&str>) -> Result<(), RecordError> {
    if let Some(dimensions) = dimensions
        && dimensions.chars().count() > DIMENSIONS_MAX_CHARS
    {
        return Err(RecordError::DimensionsTooLong);
    }
    Ok(())
}

/// Validate that `url` is an absolute `http://` or `https://` URL with a host.
pub fn validate_asset_url(url: &str, field: &'static str) -> Result<(), RecordError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(RecordError::MissingUrl(field));
    }
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or(RecordError::InvalidUrl(field))?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() || url.chars().any(char::is_whitespace) {
        return Err(RecordError::InvalidUrl(field));
    }
    Ok(())
}
