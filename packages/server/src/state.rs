use std::sync::Arc;

use common::ingest::Ingestor;
use common::storage::ObjectStore;

use crate::config::AppConfig;
use crate::store::{PaintingStore, SiteStore};

/// Shared handler state. Every request reads through these handles; nothing
/// is cached between requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub paintings: Arc<dyn PaintingStore>,
    pub site: Arc<dyn SiteStore>,
    pub objects: Arc<dyn ObjectStore>,
    pub ingestor: Arc<Ingestor>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        paintings: Arc<dyn PaintingStore>,
        site: Arc<dyn SiteStore>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        let ingestor = Ingestor::new(config.upload.pipeline(), config.storage.buckets());
        Self {
            config: Arc::new(config),
            paintings,
            site,
            objects,
            ingestor: Arc::new(ingestor),
        }
    }
}
