use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use common::PaintingRecord;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminUser;
use crate::extractors::json::AppJson;
use crate::handlers::gallery::build_listing;
use crate::models::painting::*;
use crate::models::site::FEATURED_MIN;
use crate::state::AppState;

/// Delete the stored original and thumbnail of a removed painting.
///
/// URLs this object store did not issue (legacy site paths, external hosts)
/// are skipped. Failures are logged and do not undo the deletion.
async fn remove_assets(state: &AppState, record: &PaintingRecord) {
    let buckets = &state.ingestor.buckets;
    let assets = [
        (&buckets.originals, &record.image_url),
        (&buckets.thumbnails, &record.thumbnail_url),
    ];
    for (bucket, url) in assets {
        let Some(path) = state.objects.object_path_for_url(bucket, url) else {
            continue;
        };
        if let Err(e) = state.objects.delete(bucket, &path).await {
            warn!(bucket = %bucket, path = %path, error = %e, "Failed to delete painting asset");
        }
    }
}

async fn find_painting(state: &AppState, id: &str) -> Result<PaintingRecord, AppError> {
    state
        .paintings
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Painting not found".into()))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Paintings",
    operation_id = "listPaintings",
    summary = "List all paintings",
    description = "Returns published and unpublished paintings with the same filter and pagination contract as the public gallery. `published` narrows by the publish gate.",
    params(AdminPaintingQuery),
    responses(
        (status = 200, description = "Filtered page of paintings", body = GalleryListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _admin, query))]
pub async fn list_paintings(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<AdminPaintingQuery>,
) -> Result<Json<GalleryListResponse>, AppError> {
    let gallery = &state.config.gallery;
    let per_page = gallery.page_size_for(query.per_page(), gallery.admin_page_size);

    let records = state.paintings.list(query.published()).await?;
    Ok(Json(build_listing(
        &records,
        &query.criteria(),
        query.page(),
        per_page,
    )))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Paintings",
    operation_id = "createPainting",
    summary = "Create a painting",
    description = "Creates a painting record pointing at assets returned by the upload endpoint. New paintings are placed after all existing ones in curated order.",
    request_body = CreatePaintingRequest,
    responses(
        (status = 201, description = "Painting created", body = PaintingRecord),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, admin, payload), fields(title = %payload.title))]
pub async fn create_painting(
    admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePaintingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let order = state.paintings.next_order().await?;
    let record = payload.into_record(Uuid::now_v7().to_string(), order, Utc::now())?;
    state.paintings.put(&record).await?;

    info!(id = %record.id, by = %admin.subject, "Painting created");
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Paintings",
    operation_id = "getPainting",
    summary = "Get a painting",
    params(("id" = String, Path, description = "Painting ID")),
    responses(
        (status = 200, description = "Painting", body = PaintingRecord),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Painting not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _admin), fields(id = %id))]
pub async fn get_painting(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PaintingRecord>, AppError> {
    Ok(Json(find_painting(&state, &id).await?))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Paintings",
    operation_id = "updatePainting",
    summary = "Update a painting",
    description = "Partially updates a painting using PATCH semantics. Only provided fields are modified; `updatedAt` is refreshed.",
    params(("id" = String, Path, description = "Painting ID")),
    request_body = UpdatePaintingRequest,
    responses(
        (status = 200, description = "Painting updated", body = PaintingRecord),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Painting not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _admin, payload), fields(id = %id))]
pub async fn update_painting(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdatePaintingRequest>,
) -> Result<Json<PaintingRecord>, AppError> {
    let mut record = find_painting(&state, &id).await?;
    payload.apply(&mut record, Utc::now())?;
    state.paintings.put(&record).await?;
    Ok(Json(record))
}

#[utoipa::path(
    put,
    path = "/{id}/published",
    tag = "Paintings",
    operation_id = "setPaintingPublished",
    summary = "Publish or unpublish a painting",
    params(("id" = String, Path, description = "Painting ID")),
    request_body = PublishRequest,
    responses(
        (status = 200, description = "Publish gate updated", body = PaintingRecord),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Painting not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _admin, payload), fields(id = %id, published = payload.published))]
pub async fn set_published(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<PublishRequest>,
) -> Result<Json<PaintingRecord>, AppError> {
    let mut record = find_painting(&state, &id).await?;
    if record.published != payload.published {
        record.published = payload.published;
        record.updated_at = Utc::now();
        state.paintings.put(&record).await?;
    }
    Ok(Json(record))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Paintings",
    operation_id = "deletePainting",
    summary = "Delete a painting",
    description = "Deletes the record, removes it from the featured selection and deletes its stored image assets.",
    params(("id" = String, Path, description = "Painting ID")),
    responses(
        (status = 204, description = "Painting deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Painting not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, admin), fields(id = %id))]
pub async fn delete_painting(
    admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let record = find_painting(&state, &id).await?;
    let featured = state.site.featured_ids().await?;
    if !state.paintings.delete(&id).await? {
        return Err(AppError::NotFound("Painting not found".into()));
    }

    if featured.iter().any(|f| f == &id) {
        let remaining: Vec<String> = featured.into_iter().filter(|f| f != &id).collect();
        state.site.set_featured_ids(&remaining).await?;
        if remaining.len() < FEATURED_MIN {
            warn!(
                remaining = remaining.len(),
                minimum = FEATURED_MIN,
                "Featured selection is below the minimum after delete"
            );
        }
    }

    remove_assets(&state, &record).await;

    info!(id = %id, by = %admin.subject, "Painting deleted");
    Ok(StatusCode::NO_CONTENT)
}
