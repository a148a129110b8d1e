use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/gallery", gallery_routes())
        .routes(routes!(handlers::gallery::get_site))
        .nest("/admin", admin_routes(config))
}

fn gallery_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::gallery::list_gallery))
        .routes(routes!(handlers::gallery::list_years))
        .routes(routes!(handlers::gallery::list_featured))
        .routes(routes!(handlers::gallery::get_gallery_painting))
}

fn admin_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/paintings", painting_routes())
        .nest("/uploads", upload_routes(config))
        .routes(routes!(
            handlers::settings::get_featured,
            handlers::settings::put_featured
        ))
        .routes(routes!(handlers::settings::put_home_settings))
        .routes(routes!(handlers::settings::put_site_settings))
        .routes(routes!(
            handlers::settings::get_artist,
            handlers::settings::put_artist
        ))
}

fn painting_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::painting::list_paintings,
            handlers::painting::create_painting
        ))
        .routes(routes!(
            handlers::painting::get_painting,
            handlers::painting::update_painting,
            handlers::painting::delete_painting
        ))
        .routes(routes!(handlers::painting::set_published))
}

fn upload_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::upload::upload_image))
        .layer(handlers::upload::upload_body_limit(config.upload.max_file_size))
}
