use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use common::{FilterCriteria, PaintingRecord, distinct_years, filter_paintings, page_window, paginate};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::painting::*;
use crate::models::site::SiteResponse;
use crate::state::AppState;

/// Filter, paginate and decorate `records` for a listing response.
///
/// `years` is computed over all of `records`, before filtering, so the
/// filter dropdown keeps offering every year.
pub(crate) fn build_listing(
    records: &[PaintingRecord],
    criteria: &FilterCriteria,
    page: i64,
    per_page: u64,
) -> GalleryListResponse {
    let years = distinct_years(records);
    let filtered = filter_paintings(records, criteria);
    let page = paginate(&filtered, page, per_page);
    let page_window = page_window(page.info.current_page, page.info.total_pages);
    GalleryListResponse {
        items: page.items,
        pagination: page.info,
        page_window,
        years,
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Gallery",
    operation_id = "listGallery",
    summary = "List published paintings",
    description = "Returns published paintings sorted by curated order, narrowed by optional `year`, `status` and `q`/`search` filters and paginated. Malformed query values are ignored. Out-of-range page numbers are clamped.",
    params(GalleryQuery),
    responses(
        (status = 200, description = "Filtered page of paintings", body = GalleryListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_gallery(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<GalleryListResponse>, AppError> {
    let gallery = &state.config.gallery;
    let per_page = gallery.page_size_for(query.per_page(), gallery.page_size);

    let records = state.paintings.list(Some(true)).await?;
    Ok(Json(build_listing(
        &records,
        &query.criteria(),
        query.page(),
        per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/years",
    tag = "Gallery",
    operation_id = "listGalleryYears",
    summary = "List years with published paintings",
    responses(
        (status = 200, description = "Distinct years, newest first", body = YearsResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_years(State(state): State<AppState>) -> Result<Json<YearsResponse>, AppError> {
    let records = state.paintings.list(Some(true)).await?;
    Ok(Json(YearsResponse {
        years: distinct_years(&records),
    }))
}

#[utoipa::path(
    get,
    path = "/featured",
    tag = "Gallery",
    operation_id = "listFeatured",
    summary = "List featured paintings",
    description = "Returns the curated featured selection in its configured order. Paintings that have since been unpublished or deleted are skipped.",
    responses(
        (status = 200, description = "Featured paintings", body = FeaturedPaintingsResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_featured(
    State(state): State<AppState>,
) -> Result<Json<FeaturedPaintingsResponse>, AppError> {
    let ids = state.site.featured_ids().await?;
    let mut published: HashMap<String, PaintingRecord> = state
        .paintings
        .list(Some(true))
        .await?
        .into_iter()
        .map(|r| (r.id.clone(), r))
        .collect();

    let items = ids.iter().filter_map(|id| published.remove(id)).collect();
    Ok(Json(FeaturedPaintingsResponse { items }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Gallery",
    operation_id = "getGalleryPainting",
    summary = "Get a published painting",
    params(("id" = String, Path, description = "Painting ID")),
    responses(
        (status = 200, description = "Painting", body = PaintingRecord),
        (status = 404, description = "Painting not found or not published (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn get_gallery_painting(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PaintingRecord>, AppError> {
    match state.paintings.get(&id).await? {
        Some(record) if record.published => Ok(Json(record)),
        _ => Err(AppError::NotFound("Painting not found".into())),
    }
}

#[utoipa::path(
    get,
    path = "/site",
    tag = "Gallery",
    operation_id = "getSite",
    summary = "Get site content",
    description = "Returns the site settings, home page content, artist profile and featured ids in one document.",
    responses(
        (status = 200, description = "Site content", body = SiteResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn get_site(State(state): State<AppState>) -> Result<Json<SiteResponse>, AppError> {
    Ok(Json(SiteResponse {
        site: state.site.site_settings().await?,
        home: state.site.home_settings().await?,
        artist: state.site.artist().await?,
        featured_ids: state.site.featured_ids().await?,
    }))
}
