use axum::Json;
use axum::extract::State;
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminUser;
use crate::extractors::json::AppJson;
use crate::models::shared::validate_id_list;
use crate::models::site::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/featured",
    tag = "Settings",
    operation_id = "getFeaturedIds",
    summary = "Get the featured selection",
    responses(
        (status = 200, description = "Featured painting ids in display order", body = FeaturedResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _admin))]
pub async fn get_featured(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<FeaturedResponse>, AppError> {
    Ok(Json(FeaturedResponse {
        ids: state.site.featured_ids().await?,
    }))
}

#[utoipa::path(
    put,
    path = "/featured",
    tag = "Settings",
    operation_id = "setFeaturedIds",
    summary = "Replace the featured selection",
    description = "Replaces the featured selection with 3 to 6 distinct painting ids, in display order. Every id must reference an existing painting.",
    request_body = FeaturedRequest,
    responses(
        (status = 200, description = "Featured selection replaced", body = FeaturedResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, admin, payload), fields(count = payload.ids.len()))]
pub async fn put_featured(
    admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<FeaturedRequest>,
) -> Result<Json<FeaturedResponse>, AppError> {
    validate_id_list(&payload.ids, "featured", FEATURED_MIN, FEATURED_MAX)?;
    for id in &payload.ids {
        if state.paintings.get(id).await?.is_none() {
            return Err(AppError::Validation(format!("Painting {id} does not exist")));
        }
    }

    state.site.set_featured_ids(&payload.ids).await?;
    info!(by = %admin.subject, "Featured selection replaced");
    Ok(Json(FeaturedResponse { ids: payload.ids }))
}

#[utoipa::path(
    put,
    path = "/settings/home",
    tag = "Settings",
    operation_id = "updateHomeSettings",
    summary = "Update home page content",
    description = "Merges the provided fields into the home page settings. Hero title max 50 characters, subtitle max 100, artist statement max 2000.",
    request_body = UpdateHomeSettingsRequest,
    responses(
        (status = 200, description = "Updated home settings", body = HomeSettings),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _admin, payload))]
pub async fn put_home_settings(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateHomeSettingsRequest>,
) -> Result<Json<HomeSettings>, AppError> {
    let mut home = state.site.home_settings().await?;
    payload.apply(&mut home)?;
    state.site.put_home_settings(&home).await?;
    Ok(Json(home))
}

#[utoipa::path(
    put,
    path = "/settings/site",
    tag = "Settings",
    operation_id = "updateSiteSettings",
    summary = "Update site-wide settings",
    request_body = UpdateSiteSettingsRequest,
    responses(
        (status = 200, description = "Updated site settings", body = SiteSettings),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _admin, payload))]
pub async fn put_site_settings(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateSiteSettingsRequest>,
) -> Result<Json<SiteSettings>, AppError> {
    let mut site = state.site.site_settings().await?;
    payload.apply(&mut site)?;
    state.site.put_site_settings(&site).await?;
    Ok(Json(site))
}

#[utoipa::path(
    get,
    path = "/artist",
    tag = "Settings",
    operation_id = "getArtist",
    summary = "Get the artist profile",
    responses(
        (status = 200, description = "Artist profile", body = ArtistProfile),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _admin))]
pub async fn get_artist(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<ArtistProfile>, AppError> {
    Ok(Json(state.site.artist().await?))
}

#[utoipa::path(
    put,
    path = "/artist",
    tag = "Settings",
    operation_id = "updateArtist",
    summary = "Update the artist profile",
    description = "Merges the provided fields into the artist profile. A present `timeline` replaces the stored one.",
    request_body = UpdateArtistRequest,
    responses(
        (status = 200, description = "Updated artist profile", body = ArtistProfile),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _admin, payload))]
pub async fn put_artist(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateArtistRequest>,
) -> Result<Json<ArtistProfile>, AppError> {
    let mut artist = state.site.artist().await?;
    payload.apply(&mut artist)?;
    state.site.put_artist(&artist).await?;
    Ok(Json(artist))
}
