//! CatalogIndex building, validation and accessor implementations.
//!
//! This module builds the CatalogIndex from a snapshot:
//! - Insert items and history records
//! - Build the secondary media-type index
//! - Validate references and value ranges
//!
//! It also wires the index up as the engine's `CatalogAccessor` and
//! `HistoryAccessor`.

use crate::accessor::{CatalogAccessor, HistoryAccessor};
use crate::error::{CatalogError, Result};
use crate::snapshot::{self, CatalogSnapshot};
use crate::types::*;
use std::path::Path;
use tracing::info;

impl CatalogIndex {
    /// Load a catalog snapshot from a JSON file
    ///
    /// Steps:
    /// 1. Parse the snapshot
    /// 2. Insert items, ratings and signals
    /// 3. Build the media-type index
    /// 4. Validate data integrity
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading catalog snapshot from {:?}", path);
        let snapshot = snapshot::read_snapshot(path)?;
        let index = Self::from_snapshot(snapshot)?;

        let (items, ratings, signals) = index.counts();
        info!(
            "Loaded {} items, {} ratings, {} watch signals",
            items, ratings, signals
        );
        Ok(index)
    }

    /// Build and validate an index from an in-memory snapshot
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Result<Self> {
        let mut index = CatalogIndex::new();

        for item in snapshot.items {
            index.insert_item(item);
        }
        for rating in snapshot.ratings {
            index.insert_rating(rating);
        }
        for signal in snapshot.signals {
            index.insert_signal(signal);
        }

        index.build_secondary_indices();
        index.validate()?;
        Ok(index)
    }

    /// Group item ids by media type
    pub fn build_secondary_indices(&mut self) {
        self.media_index.clear();
        for (item_id, item) in &self.items {
            self.media_index
                .entry(item.media_type)
                .or_default()
                .push(*item_id);
        }
        for ids in self.media_index.values_mut() {
            ids.sort_unstable();
        }
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - Every rating and signal references a known item
    /// - Rating values are finite and within 0-100
    pub fn validate(&self) -> Result<()> {
        for ratings in self.user_ratings.values() {
            for rating in ratings {
                if !self.items.contains_key(&rating.item_id) {
                    return Err(CatalogError::MissingReference {
                        entity: "Item".to_string(),
                        id: rating.item_id,
                    });
                }
                if !rating.value.is_finite() || !(0.0..=100.0).contains(&rating.value) {
                    return Err(CatalogError::InvalidValue {
                        field: "rating".to_string(),
                        value: rating.value.to_string(),
                    });
                }
            }
        }

        for signals in self.user_signals.values() {
            for signal in signals {
                if !self.items.contains_key(&signal.item_id) {
                    return Err(CatalogError::MissingReference {
                        entity: "Item".to_string(),
                        id: signal.item_id,
                    });
                }
            }
        }

        for user_id in self.user_ids() {
            if user_id.trim().is_empty() {
                return Err(CatalogError::ValidationError(
                    "records with an empty user id".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl CatalogAccessor for CatalogIndex {
    fn item(&self, id: ItemId) -> Option<&CatalogItem> {
        self.get_item(id)
    }
}

impl HistoryAccessor for CatalogIndex {
    fn history(&self, user_id: &str) -> UserHistory {
        let mut history = UserHistory {
            ratings: self.get_user_ratings(user_id).to_vec(),
            signals: self.get_user_signals(user_id).to_vec(),
        };

        if user_id != ANONYMOUS_USER {
            history
                .ratings
                .extend_from_slice(self.get_user_ratings(ANONYMOUS_USER));
            history
                .signals
                .extend_from_slice(self.get_user_signals(ANONYMOUS_USER));
        }
        history
    }

    fn generation(&self, user_id: &str) -> u64 {
        if user_id == ANONYMOUS_USER {
            self.own_generation(user_id)
        } else {
            self.own_generation(user_id) + self.own_generation(ANONYMOUS_USER)
        }
    }
}
