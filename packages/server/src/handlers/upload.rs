use axum::Json;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{Datelike, Utc};
use common::ingest::UploadResult;
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminUser;
use crate::models::shared::lenient;
use crate::state::AppState;

/// Room for multipart boundaries and the `year` field on top of the file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn upload_body_limit(max_file_size: u64) -> DefaultBodyLimit {
    let max = usize::try_from(max_file_size).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(max.saturating_add(MULTIPART_OVERHEAD))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload too large: {}", err.body_text()))
    } else {
        AppError::Validation(format!("Multipart error: {}", err.body_text()))
    }
}

/// Buffer a file field, giving up as soon as it grows past `max_size`.
async fn read_limited(mut field: Field<'_>, max_size: u64) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if (data.len() + chunk.len()) as u64 > max_size {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds maximum size of {max_size} bytes"
            )));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Uploads",
    operation_id = "uploadImage",
    summary = "Upload a painting image",
    description = "Accepts a JPEG, PNG or WebP image in the `file` field (max 10 MB by default) and an optional `year` field. \
        The original is normalised to JPEG and stored with a derived thumbnail at most 400px wide, both under `<year>/`. \
        When the thumbnail cannot be stored the original URL is returned in its place. \
        A missing or malformed year falls back to the current year.",
    request_body(content_type = "multipart/form-data", description = "Image file with optional year"),
    responses(
        (status = 201, description = "Image stored", body = UploadResult),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 413, description = "File too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
        (status = 415, description = "Unsupported image type (UNSUPPORTED_MEDIA_TYPE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, admin, multipart))]
pub async fn upload_image(
    admin: AdminUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let max_size = state.config.upload.max_file_size;

    let mut file: Option<(Vec<u8>, Option<String>)> = None;
    let mut year_field: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("file") => {
                let declared = field.content_type().map(str::to_string).or_else(|| {
                    field
                        .file_name()
                        .and_then(|name| mime_guess::from_path(name).first())
                        .map(|m| m.to_string())
                });
                let data = read_limited(field, max_size).await?;
                file = Some((data, declared));
            }
            Some("year") => {
                let text = field.text().await.map_err(multipart_error)?;
                year_field = Some(text);
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let (bytes, declared) =
        file.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".into()));
    }

    let year = lenient::<i32>(year_field.as_deref()).unwrap_or_else(|| Utc::now().year());

    let result = state
        .ingestor
        .ingest(state.objects.as_ref(), bytes, declared.as_deref(), year)
        .await?;

    info!(
        year,
        size = result.size,
        image_url = %result.image_url,
        by = %admin.subject,
        "Image uploaded"
    );
    Ok((StatusCode::CREATED, Json(result)))
}
