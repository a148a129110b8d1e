use chrono::{DateTime, Utc};
use common::painting::{
    validate_asset_url, validate_description, validate_dimensions, validate_title, validate_year,
};
use common::{FilterCriteria, PageInfo, PageLink, PaintingRecord, PaintingStatus};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::models::shared::{double_option, lenient};

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaintingRequest {
    /// Display title (1-100 characters after trimming).
    #[schema(example = "春山烟雨")]
    pub title: String,
    /// Free-text description (max 5000 characters).
    #[serde(default)]
    pub description: String,
    /// Creation year (1900-2100).
    #[schema(example = 2024)]
    pub year: i32,
    /// Physical size, e.g. `68x136 cm` (max 50 characters).
    pub dimensions: Option<String>,
    /// Defaults to `FOR_SALE`.
    pub status: Option<PaintingStatus>,
    pub artist: Option<String>,
    /// URL returned by the upload endpoint.
    pub image_url: String,
    /// URL returned by the upload endpoint.
    pub thumbnail_url: String,
    /// Defaults to `false`; new paintings stay hidden until published.
    #[serde(default)]
    pub published: bool,
}

/// PATCH body for a painting. Absent fields are left unchanged; `dimensions`
/// and `artist` may be set to `null` to clear them.
#[derive(Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaintingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub dimensions: Option<Option<String>>,
    pub status: Option<PaintingStatus>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub artist: Option<Option<String>>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub published: Option<bool>,
    pub order: Option<i32>,
}

#[derive(Deserialize, ToSchema)]
pub struct PublishRequest {
    pub published: bool,
}

/// Public listing query. Malformed values are ignored rather than rejected.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GalleryQuery {
    /// Exact creation year.
    pub year: Option<String>,
    /// `FOR_SALE`, `CUSTOMIZABLE` or `SOLD` (display labels also accepted).
    pub status: Option<String>,
    /// Free-text search over title, description and artist.
    pub q: Option<String>,
    /// Alias of `q`.
    pub search: Option<String>,
    /// Page number (1-based, clamped into range).
    pub page: Option<String>,
    /// Items per page (capped by configuration).
    pub per_page: Option<String>,
}

/// Admin listing query: the public parameters plus the publish gate.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminPaintingQuery {
    pub year: Option<String>,
    pub status: Option<String>,
    pub q: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
    /// `true` or `false`; absent lists both.
    pub published: Option<String>,
}

fn criteria_from(
    year: Option<&str>,
    status: Option<&str>,
    q: Option<&str>,
    search: Option<&str>,
) -> FilterCriteria {
    let search = [q, search]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string);
    FilterCriteria {
        year: lenient(year),
        status: lenient(status),
        search,
    }
}

impl GalleryQuery {
    pub fn criteria(&self) -> FilterCriteria {
        criteria_from(
            self.year.as_deref(),
            self.status.as_deref(),
            self.q.as_deref(),
            self.search.as_deref(),
        )
    }

    pub fn page(&self) -> i64 {
        lenient(self.page.as_deref()).unwrap_or(1)
    }

    pub fn per_page(&self) -> Option<u64> {
        lenient(self.per_page.as_deref())
    }
}

impl AdminPaintingQuery {
    pub fn criteria(&self) -> FilterCriteria {
        criteria_from(
            self.year.as_deref(),
            self.status.as_deref(),
            self.q.as_deref(),
            self.search.as_deref(),
        )
    }

    pub fn page(&self) -> i64 {
        lenient(self.page.as_deref()).unwrap_or(1)
    }

    pub fn per_page(&self) -> Option<u64> {
        lenient(self.per_page.as_deref())
    }

    pub fn published(&self) -> Option<bool> {
        lenient(self.published.as_deref())
    }
}

/// A filtered, paginated slice of paintings.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalleryListResponse {
    pub items: Vec<PaintingRecord>,
    pub pagination: PageInfo,
    /// Page-number controls for the current page.
    pub page_window: Vec<PageLink>,
    /// Distinct years among the listable paintings, newest first.
    pub years: Vec<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct YearsResponse {
    pub years: Vec<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct FeaturedPaintingsResponse {
    pub items: Vec<PaintingRecord>,
}

fn trimmed_opt(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl CreatePaintingRequest {
    /// Validate and build a new, not yet stored record.
    pub fn into_record(self, id: String, order: i32, now: DateTime<Utc>) -> Result<PaintingRecord, AppError> {
        validate_title(&self.title)?;
        validate_description(&self.description)?;
        validate_year(self.year)?;
        let dimensions = trimmed_opt(self.dimensions);
        validate_dimensions(dimensions.as_deref())?;
        validate_asset_url(&self.image_url, "imageUrl")?;
        validate_asset_url(&self.thumbnail_url, "thumbnailUrl")?;

        Ok(PaintingRecord {
            id,
            title: self.title.trim().to_string(),
            description: self.description,
            year: self.year,
            dimensions,
            status: self.status.unwrap_or(PaintingStatus::ForSale),
            artist: trimmed_opt(self.artist),
            image_url: self.image_url.trim().to_string(),
            thumbnail_url: self.thumbnail_url.trim().to_string(),
            published: self.published,
            order,
            created_at: now,
            updated_at: now,
        })
    }
}

impl UpdatePaintingRequest {
    /// Validate and merge into `record`, refreshing `updated_at`.
    pub fn apply(self, record: &mut PaintingRecord, now: DateTime<Utc>) -> Result<(), AppError> {
        if let Some(title) = self.title {
            validate_title(&title)?;
            record.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            validate_description(&description)?;
            record.description = description;
        }
        if let Some(year) = self.year {
            validate_year(year)?;
            record.year = year;
        }
        if let Some(dimensions) = self.dimensions {
            let dimensions = trimmed_opt(dimensions);
            validate_dimensions(dimensions.as_deref())?;
            record.dimensions = dimensions;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(artist) = self.artist {
            record.artist = trimmed_opt(artist);
        }
        if let Some(url) = self.image_url {
            validate_asset_url(&url, "imageUrl")?;
            record.image_url = url.trim().to_string();
        }
        if let Some(url) = self.thumbnail_url {
            validate_asset_url(&url, "thumbnailUrl")?;
            record.thumbnail_url = url.trim().to_string();
        }
        if let Some(published) = self.published {
            record.published = published;
        }
        if let Some(order) = self.order {
            if order < 0 {
                return Err(AppError::Validation("Order must be >= 0".into()));
            }
            record.order = order;
        }
        record.updated_at = now;
        Ok(())
    }
}
