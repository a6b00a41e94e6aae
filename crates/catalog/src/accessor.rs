//! Collaborator interfaces consumed by the prediction engine.
//!
//! The engine is handed implementations of these traits instead of
//! reaching into global state, so the same engine can run against the
//! in-memory `CatalogIndex`, a database-backed store, or test fixtures.

use crate::types::{CatalogItem, ItemId, UserHistory};

/// Resolves item ids to catalog metadata.
pub trait CatalogAccessor: Send + Sync {
    /// Look up an item; `None` if the catalog does not know it
    fn item(&self, id: ItemId) -> Option<&CatalogItem>;
}

/// Provides the rating history for an identity.
pub trait HistoryAccessor: Send + Sync {
    /// All explicit ratings and implicit signals for `user_id`, merged with
    /// the records of the anonymous identity. The user's own records come
    /// first.
    fn history(&self, user_id: &str) -> UserHistory;

    /// Change counter for `user_id`'s merged history.
    ///
    /// Must strictly increase whenever a record of the user or of the
    /// anonymous identity is added, changed, removed or migrated. Profile
    /// caches use it to detect stale entries.
    fn generation(&self, user_id: &str) -> u64;
}
