pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod seed;
pub mod state;
pub mod store;
pub mod utils;

use std::path::Path;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::routing::get;
use common::config::{StorageBackend, StorageConfig};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ink Gallery API",
        version = "1.0.0",
        description = "Public gallery and content management API for a Chinese ink-painting portfolio"
    ),
    tags(
        (name = "Gallery", description = "Public, read-only gallery endpoints"),
        (name = "Paintings", description = "Painting record management"),
        (name = "Uploads", description = "Image upload and thumbnail derivation"),
        (name = "Settings", description = "Site settings, featured selection and artist profile"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// CORS policy from configuration. `None` when no origin is allowed.
fn cors_layer(cors: &CorsConfig) -> Option<CorsLayer> {
    if cors.allow_origins.is_empty() {
        return None;
    }
    let origins = if cors.allow_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let list: Vec<HeaderValue> = cors
            .allow_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(list)
    };
    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
            .max_age(Duration::from_secs(cors.max_age)),
    )
}

/// Static serving of the filesystem backend's buckets under `/media/<bucket>`.
///
/// Only the bucket directories are exposed, so files still being staged by a
/// write are never reachable.
fn media_routes(storage: &StorageConfig) -> axum::Router {
    let root = Path::new(&storage.root);
    let mut buckets = vec![&storage.originals_bucket, &storage.thumbnails_bucket];
    buckets.dedup();
    buckets.into_iter().fold(axum::Router::new(), |router, bucket| {
        router.nest_service(&format!("/media/{bucket}"), ServeDir::new(root.join(bucket)))
    })
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let config = state.config.clone();

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", routes::api_routes(&config))
        .split_for_parts();

    let mut router = router
        .route("/sitemap.xml", get(handlers::sitemap::sitemap))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api));

    if config.storage.backend == StorageBackend::Filesystem {
        router = router.merge(media_routes(&config.storage));
    }

    match cors_layer(&config.server.cors) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}
