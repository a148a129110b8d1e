use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use common::{PaintingRecord, PaintingStatus};
use common::snapshot::{Snapshot, diff_ids, year_counts};
use console::style;
use serde::Serialize;

use server::config::AppConfig;
use server::store::PaintingStore;
use server::store::db::DbPaintingStore;

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearStats {
    pub total: usize,
    pub published: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub published: usize,
    /// Every status is present, with zero counts included.
    pub by_status: BTreeMap<PaintingStatus, usize>,
    pub by_year: BTreeMap<i32, YearStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SnapshotComparison>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotComparison {
    pub snapshot_records: usize,
    pub snapshot_by_year: BTreeMap<i32, usize>,
    pub rejected: usize,
    pub only_in_store: Vec<String>,
    pub only_in_snapshot: Vec<String>,
}

pub fn compute(stored: &[PaintingRecord], snapshot: Option<&Snapshot>) -> Stats {
    let mut by_status: BTreeMap<PaintingStatus, usize> =
        PaintingStatus::ALL.iter().map(|s| (*s, 0)).collect();
    let mut by_year: BTreeMap<i32, YearStats> = BTreeMap::new();
    for record in stored {
        *by_status.entry(record.status).or_insert(0) += 1;
        let entry = by_year.entry(record.year).or_default();
        entry.total += 1;
        entry.published += usize::from(record.published);
    }

    let snapshot = snapshot.map(|snapshot| {
        let loaded = snapshot.load();
        let diff = diff_ids(stored, &loaded.records);
        SnapshotComparison {
            snapshot_records: loaded.records.len(),
            snapshot_by_year: year_counts(&loaded.records),
            rejected: loaded.rejected.len(),
            only_in_store: diff.only_in_store,
            only_in_snapshot: diff.only_in_snapshot,
        }
    });

    Stats {
        total: stored.len(),
        published: stored.iter().filter(|r| r.published).count(),
        by_status,
        by_year,
        snapshot,
    }
}

fn print_human(stats: &Stats) {
    println!("{}", style("Paintings by year").bold());
    for (year, counts) in stats.by_year.iter().rev() {
        let legacy = stats
            .snapshot
            .as_ref()
            .map(|s| format!("  snapshot {}", s.snapshot_by_year.get(year).copied().unwrap_or(0)))
            .unwrap_or_default();
        println!("  {year}  {:>4} ({} published){legacy}", counts.total, counts.published);
    }
    println!("  total {} ({} published)", stats.total, stats.published);

    println!("{}", style("Paintings by status").bold());
    for (status, count) in &stats.by_status {
        println!("  {:<12} {:>4}  {}", status.as_str(), count, status.label());
    }

    let Some(snapshot) = &stats.snapshot else {
        return;
    };
    println!();
    println!(
        "{} {} valid records, {} rejected",
        style("Snapshot").bold(),
        snapshot.snapshot_records,
        snapshot.rejected
    );
    if snapshot.only_in_store.is_empty() && snapshot.only_in_snapshot.is_empty() {
        println!("  {}", style("store and snapshot hold the same ids").green());
        return;
    }
    for id in &snapshot.only_in_snapshot {
        println!("  {} {id}", style("missing from store:").yellow());
    }
    for id in &snapshot.only_in_store {
        println!("  {} {id}", style("not in snapshot:").cyan());
    }
}

pub async fn stats_cmd(config: &AppConfig, snapshot: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let snapshot = match snapshot {
        Some(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Some(Snapshot::from_json(&text).with_context(|| format!("{} is not a snapshot", path.display()))?)
        }
        None => None,
    };

    let db = super::connect(config).await?;
    let stored = DbPaintingStore::new(db).list(None).await?;
    let stats = compute(&stored, snapshot.as_ref());

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_human(&stats);
    }
    Ok(())
}
