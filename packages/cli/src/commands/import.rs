use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use common::filename::{has_image_extension, parse_painting_filename};
use common::ingest::Ingestor;
use common::snapshot::{RejectedEntry, Snapshot};
use common::storage::ObjectStore;
use common::{PaintingRecord, PaintingStatus};
use console::style;
use tracing::{info, warn};

use server::config::AppConfig;
use server::store::db::DbPaintingStore;
use server::store::{PaintingStore, StoreError};

#[derive(Debug, Default)]
pub struct SnapshotReport {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: Vec<RejectedEntry>,
}

/// Upsert every valid snapshot record. Invalid entries are reported, not written.
pub async fn import_snapshot(
    store: &dyn PaintingStore,
    snapshot: &Snapshot,
    dry_run: bool,
) -> Result<SnapshotReport, StoreError> {
    let loaded = snapshot.load();
    let mut report = SnapshotReport {
        skipped: loaded.rejected,
        ..Default::default()
    };

    for record in &loaded.records {
        if store.get(&record.id).await?.is_some() {
            report.updated += 1;
        } else {
            report.inserted += 1;
        }
        if !dry_run {
            store.put(record).await?;
        }
    }
    Ok(report)
}

pub async fn import_snapshot_cmd(config: &AppConfig, file: &Path, dry_run: bool) -> anyhow::Result<()> {
    let json = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let snapshot = Snapshot::from_json(&json).with_context(|| format!("{} is not a snapshot", file.display()))?;
    info!(
        entries = snapshot.paintings.len(),
        last_updated = snapshot.last_updated.as_deref().unwrap_or("unknown"),
        "Loaded snapshot"
    );

    let db = super::connect(config).await?;
    let store = DbPaintingStore::new(db);
    let report = import_snapshot(&store, &snapshot, dry_run).await?;

    for entry in &report.skipped {
        println!(
            "{} #{} {}: {}",
            style("skip").yellow(),
            entry.index,
            entry.id.as_deref().unwrap_or("<no id>"),
            entry.error
        );
    }
    let verb = if dry_run { "would insert" } else { "inserted" };
    println!(
        "{} {verb} {}, updated {}, skipped {}",
        style("done").green().bold(),
        report.inserted,
        report.updated,
        report.skipped.len()
    );
    Ok(())
}

/// An image found under a year directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFile {
    pub path: PathBuf,
    /// `<YEAR>/<file name>`, the form the filename parser expects.
    pub relative: String,
}

fn is_year_dir(name: &str) -> bool {
    name.len() == 4 && name.bytes().all(|b| b.is_ascii_digit())
}

/// Images directly inside the 4-digit year directories of `root`, sorted by path.
pub fn collect_images(root: &Path) -> anyhow::Result<Vec<ImageFile>> {
    let mut images = Vec::new();
    let entries = std::fs::read_dir(root).with_context(|| format!("Failed to read {}", root.display()))?;

    for entry in entries {
        let entry = entry?;
        let year = entry.file_name().to_string_lossy().into_owned();
        if !entry.file_type()?.is_dir() || !is_year_dir(&year) {
            continue;
        }
        for file in std::fs::read_dir(entry.path())? {
            let file = file?;
            let name = file.file_name().to_string_lossy().into_owned();
            if file.file_type()?.is_file() && has_image_extension(&name) {
                images.push(ImageFile {
                    path: file.path(),
                    relative: format!("{year}/{name}"),
                });
            }
        }
    }
    images.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(images)
}

#[derive(Debug, Default)]
pub struct ImagesReport {
    pub created: Vec<String>,
    /// Already present with the same year and title.
    pub existing: Vec<String>,
    pub failed: Vec<(String, String)>,
}

/// Ingest every image and create one record per image.
///
/// Records get the title and dimensions parsed from the file name, the
/// `FOR_SALE` status and the next display order.
pub async fn import_images(
    store: &dyn PaintingStore,
    objects: &dyn ObjectStore,
    ingestor: &Ingestor,
    images: &[ImageFile],
    publish: bool,
) -> Result<ImagesReport, StoreError> {
    let mut report = ImagesReport::default();
    let mut known: HashSet<(i32, String)> = store
        .list(None)
        .await?
        .into_iter()
        .map(|r| (r.year, r.title))
        .collect();

    for image in images {
        let parsed = match parse_painting_filename(&image.relative) {
            Ok(parsed) => parsed,
            Err(e) => {
                report.failed.push((image.relative.clone(), e.to_string()));
                continue;
            }
        };
        let Some(year) = parsed.year else {
            report.failed.push((image.relative.clone(), "no year in path".into()));
            continue;
        };
        if !known.insert((year, parsed.title.clone())) {
            report.existing.push(image.relative.clone());
            continue;
        }

        let bytes = match tokio::fs::read(&image.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                report.failed.push((image.relative.clone(), e.to_string()));
                continue;
            }
        };
        let declared = mime_guess::from_path(&image.path).first_raw();
        let upload = match ingestor.ingest(objects, bytes, declared, year).await {
            Ok(upload) => upload,
            Err(e) => {
                warn!(file = %image.relative, error = %e, "Image rejected");
                report.failed.push((image.relative.clone(), e.to_string()));
                continue;
            }
        };

        let now = Utc::now();
        let record = PaintingRecord {
            id: uuid::Uuid::now_v7().to_string(),
            title: parsed.title,
            description: String::new(),
            year,
            dimensions: parsed.dimensions,
            status: PaintingStatus::ForSale,
            artist: None,
            image_url: upload.image_url,
            thumbnail_url: upload.thumbnail_url,
            published: publish,
            order: store.next_order().await?,
            created_at: now,
            updated_at: now,
        };
        store.put(&record).await?;
        info!(file = %image.relative, id = %record.id, "Created painting");
        report.created.push(record.id);
    }
    Ok(report)
}

pub async fn import_images_cmd(config: &AppConfig, dir: &Path, publish: bool) -> anyhow::Result<()> {
    let images = collect_images(dir)?;
    if images.is_empty() {
        anyhow::bail!("No images found under {}/<YEAR>/", dir.display());
    }
    info!(count = images.len(), "Found images");

    let db = super::connect(config).await?;
    let store = DbPaintingStore::new(db);
    let objects = common::storage::open(&config.storage)
        .await
        .context("Failed to open object storage")?;
    let ingestor = Ingestor::new(config.upload.pipeline(), config.storage.buckets());

    let report = import_images(&store, objects.as_ref(), &ingestor, &images, publish).await?;

    for (file, reason) in &report.failed {
        println!("{} {file}: {reason}", style("fail").red());
    }
    println!(
        "{} created {}, already present {}, failed {}",
        style("done").green().bold(),
        report.created.len(),
        report.existing.len(),
        report.failed.len()
    );
    Ok(())
}
