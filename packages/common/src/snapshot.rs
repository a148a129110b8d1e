//! The legacy JSON snapshot: `{"paintings": [...], "lastUpdated": "..."}`.
//!
//! Entries are decoded one at a time so a single bad entry is reported
//! instead of failing the whole file.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Deserialize;

use crate::painting::{PaintingRecord, RecordError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub paintings: Vec<serde_json::Value>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// An entry that could not be imported.
#[derive(Debug, PartialEq, Eq)]
pub struct RejectedEntry {
    /// Position in the `paintings` array.
    pub index: usize,
    pub id: Option<String>,
    pub error: RecordError,
}

#[derive(Debug, Default)]
pub struct LoadedSnapshot {
    pub records: Vec<PaintingRecord>,
    pub rejected: Vec<RejectedEntry>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Decode and validate every entry. Later duplicates of an id are rejected.
    pub fn load(&self) -> LoadedSnapshot {
        let mut loaded = LoadedSnapshot::default();
        let mut seen = HashSet::new();

        for (index, value) in self.paintings.iter().enumerate() {
            let id = value.get("id").and_then(|v| v.as_str()).map(str::to_string);
            let record = serde_json::from_value::<PaintingRecord>(value.clone())
                .map_err(|e| RecordError::Malformed(e.to_string()))
                .and_then(|record| record.validate().map(|_| record));

            let outcome = match record {
                Ok(record) if !seen.insert(record.id.clone()) => Err(RecordError::Malformed(
                    format!("duplicate id {}", record.id),
                )),
                other => other,
            };

            match outcome {
                Ok(record) => loaded.records.push(record),
                Err(error) => loaded.rejected.push(RejectedEntry { index, id, error }),
            }
        }
        loaded
    }
}

/// Number of records per year, oldest first.
pub fn year_counts(records: &[PaintingRecord]) -> BTreeMap<i32, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.year).or_insert(0) += 1;
    }
    counts
}

/// Ids present on only one side.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct IdDiff {
    pub only_in_store: Vec<String>,
    pub only_in_snapshot: Vec<String>,
}

impl IdDiff {
    pub fn is_empty(&self) -> bool {
        self.only_in_store.is_empty() && self.only_in_snapshot.is_empty()
    }
}

/// Compare stored records with snapshot records by id.
pub fn diff_ids(stored: &[PaintingRecord], snapshot: &[PaintingRecord]) -> IdDiff {
    let stored: BTreeSet<&str> = stored.iter().map(|r| r.id.as_str()).collect();
    let snapshot: BTreeSet<&str> = snapshot.iter().map(|r| r.id.as_str()).collect();
    IdDiff {
        only_in_store: stored.difference(&snapshot).map(|s| s.to_string()).collect(),
        only_in_snapshot: snapshot.difference(&stored).map(|s| s.to_string()).collect(),
    }
}
