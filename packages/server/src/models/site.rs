use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const HERO_TITLE_MAX_CHARS: usize = 50;
pub const HERO_SUBTITLE_MAX_CHARS: usize = 100;
pub const STATEMENT_MAX_CHARS: usize = 2000;
pub const ARTIST_NAME_MAX_CHARS: usize = 50;
pub const ARTIST_TITLE_MAX_CHARS: usize = 100;
pub const ARTIST_BIO_MAX_CHARS: usize = 10_000;

/// Minimum and maximum size of the featured selection.
pub const FEATURED_MIN: usize = 3;
pub const FEATURED_MAX: usize = 6;

/// Home page hero banner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeroSettings {
    pub background_image: String,
    #[schema(example = "贝军国画")]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
}

/// Home page content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HomeSettings {
    pub hero: HeroSettings,
    #[serde(default)]
    pub artist_statement: String,
}

impl Default for HomeSettings {
    fn default() -> Self {
        Self {
            hero: HeroSettings {
                background_image: "/images/hero.jpg".into(),
                title: "贝军国画".into(),
                subtitle: "传承与创新".into(),
            },
            artist_statement: String::new(),
        }
    }
}

/// Site-wide settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub site_name: String,
    /// WeChat id for enquiries.
    #[serde(default)]
    pub wechat_id: String,
    #[serde(default)]
    pub wechat_qr_code: String,
    /// ICP registration number shown in the footer.
    #[serde(default)]
    pub icp: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "贝军国画".into(),
            wechat_id: String::new(),
            wechat_qr_code: String::new(),
            icp: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    #[schema(example = 1998)]
    pub year: i32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The artist's public profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArtistProfile {
    #[schema(example = "贝军")]
    pub name: String,
    #[serde(default)]
    pub title: String,
    pub avatar_url: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
}

impl Default for ArtistProfile {
    fn default() -> Self {
        Self {
            name: "贝军".into(),
            title: "国画艺术家".into(),
            avatar_url: "/images/artists/beijun.jpg".into(),
            bio: String::new(),
            timeline: Vec::new(),
        }
    }
}

/// Partial update of [`HeroSettings`].
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHeroRequest {
    pub background_image: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

/// Partial update of [`HomeSettings`]; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHomeSettingsRequest {
    pub hero: Option<UpdateHeroRequest>,
    pub artist_statement: Option<String>,
}

/// Partial update of [`SiteSettings`]; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSiteSettingsRequest {
    pub site_name: Option<String>,
    pub wechat_id: Option<String>,
    pub wechat_qr_code: Option<String>,
    pub icp: Option<String>,
}

/// Partial update of [`ArtistProfile`]. A present `timeline` replaces the old one.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArtistRequest {
    pub name: Option<String>,
    pub title: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub timeline: Option<Vec<TimelineEntry>>,
}

/// Replacement featured selection, in display order.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct FeaturedRequest {
    pub ids: Vec<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FeaturedResponse {
    pub ids: Vec<String>,
}

/// Everything the public pages need besides the gallery itself.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteResponse {
    pub site: SiteSettings,
    pub home: HomeSettings,
    pub artist: ArtistProfile,
    pub featured_ids: Vec<String>,
}

fn check_len(value: &str, max: usize, field: &str) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

impl UpdateHomeSettingsRequest {
    /// Validate and merge into `current`.
    pub fn apply(self, current: &mut HomeSettings) -> Result<(), AppError> {
        if let Some(hero) = self.hero {
            if let Some(title) = hero.title {
                check_len(&title, HERO_TITLE_MAX_CHARS, "Hero title")?;
                current.hero.title = title;
            }
            if let Some(subtitle) = hero.subtitle {
                check_len(&subtitle, HERO_SUBTITLE_MAX_CHARS, "Hero subtitle")?;
                current.hero.subtitle = subtitle;
            }
            if let Some(bg) = hero.background_image {
                current.hero.background_image = bg;
            }
        }
        if let Some(statement) = self.artist_statement {
            check_len(&statement, STATEMENT_MAX_CHARS, "Artist statement")?;
            current.artist_statement = statement;
        }
        Ok(())
    }
}

impl UpdateSiteSettingsRequest {
    pub fn apply(self, current: &mut SiteSettings) -> Result<(), AppError> {
        if let Some(name) = self.site_name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::Validation("Site name must not be empty".into()));
            }
            check_len(name, HERO_TITLE_MAX_CHARS, "Site name")?;
            current.site_name = name.to_string();
        }
        if let Some(v) = self.wechat_id {
            current.wechat_id = v;
        }
        if let Some(v) = self.wechat_qr_code {
            current.wechat_qr_code = v;
        }
        if let Some(v) = self.icp {
            current.icp = v;
        }
        Ok(())
    }
}

impl UpdateArtistRequest {
    pub fn apply(self, current: &mut ArtistProfile) -> Result<(), AppError> {
        if let Some(name) = self.name {
            let name = name.trim();
            if name.is_empty() || name.chars().count() > ARTIST_NAME_MAX_CHARS {
                return Err(AppError::Validation(
                    "Artist name must be 1-50 characters".into(),
                ));
            }
            current.name = name.to_string();
        }
        if let Some(title) = self.title {
            check_len(&title, ARTIST_TITLE_MAX_CHARS, "Artist title")?;
            current.title = title;
        }
        if let Some(url) = self.avatar_url {
            common::painting::validate_asset_url(&url, "avatarUrl")?;
            current.avatar_url = url;
        }
        if let Some(bio) = self.bio {
            check_len(&bio, ARTIST_BIO_MAX_CHARS, "Bio")?;
            current.bio = bio;
        }
        if let Some(timeline) = self.timeline {
            for entry in &timeline {
                if entry.title.trim().is_empty() {
                    return Err(AppError::Validation(
                        "Timeline entries must have a title".into(),
                    ));
                }
            }
            current.timeline = timeline;
        }
        Ok(())
    }
}
