//! JSON snapshot format for catalog data.
//!
//! A snapshot is a single JSON document:
//!
//! ```json
//! {
//!   "items":   [{ "id": 1, "media_type": "movie", "title": "...", "genre_ids": [28] }],
//!   "ratings": [{ "user_id": "ana", "item_id": 1, "value": 85 }],
//!   "signals": [{ "user_id": "ana", "item_id": 2, "watched_at": 1700000000 }]
//! }
//! ```
//!
//! The engine itself defines no persistence format; this exists so the
//! CLI and tests can load fixtures.

use crate::error::Result;
use crate::types::{CatalogIndex, CatalogItem, ExplicitRating, ImplicitSignal};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Serialized form of a `CatalogIndex`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub items: Vec<CatalogItem>,
    #[serde(default)]
    pub ratings: Vec<ExplicitRating>,
    #[serde(default)]
    pub signals: Vec<ImplicitSignal>,
}

/// Parse a snapshot from a JSON string
pub fn parse_snapshot(json: &str) -> Result<CatalogSnapshot> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a snapshot file
pub fn read_snapshot(path: &Path) -> Result<CatalogSnapshot> {
    let contents = fs::read_to_string(path)?;
    parse_snapshot(&contents)
}

/// Write a snapshot file (pretty-printed)
pub fn write_snapshot(path: &Path, snapshot: &CatalogSnapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;
    Ok(())
}

impl CatalogIndex {
    /// Export every item and record, sorted for stable output
    pub fn to_snapshot(&self) -> CatalogSnapshot {
        let items = self.items().into_iter().cloned().collect();

        let mut ratings: Vec<ExplicitRating> =
            self.user_ratings.values().flatten().cloned().collect();
        ratings.sort_by(|a, b| (&a.user_id, a.item_id).cmp(&(&b.user_id, b.item_id)));

        let mut signals: Vec<ImplicitSignal> =
            self.user_signals.values().flatten().cloned().collect();
        signals.sort_by(|a, b| (&a.user_id, a.item_id).cmp(&(&b.user_id, b.item_id)));

        CatalogSnapshot {
            items,
            ratings,
            signals,
        }
    }
}
