use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{Level, info};

use server::config::AppConfig;
use server::state::AppState;
use server::store::db::{DbPaintingStore, DbSiteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    anyhow::ensure!(
        !config.auth.jwt_secret.is_empty(),
        "auth.jwt_secret must be set (GALLERY__AUTH__JWT_SECRET)"
    );

    let db = server::database::init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    server::seed::ensure_indexes(&db).await?;
    server::seed::seed_defaults(&db)
        .await
        .context("Failed to seed default site documents")?;

    let objects = common::storage::open(&config.storage)
        .await
        .context("Failed to open object storage")?;
    info!(backend = ?config.storage.backend, "Object storage ready");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server.host / server.port")?;

    let state = AppState::new(
        config,
        Arc::new(DbPaintingStore::new(db.clone())),
        Arc::new(DbSiteStore::new(db)),
        objects,
    );
    let app = server::build_router(state);

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
