//! # Catalog Crate
//!
//! Catalog metadata and user history consumed by the preference engine.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (CatalogItem, ExplicitRating, ImplicitSignal, CatalogIndex)
//! - **accessor**: The `CatalogAccessor` / `HistoryAccessor` traits the engine depends on
//! - **index**: Building, validating and serving the in-memory CatalogIndex
//! - **snapshot**: JSON snapshot loading for fixtures and the CLI
//! - **names**: Display names for genre ids and language/country codes
//! - **error**: Error types for loading catalog data
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{CatalogIndex, HistoryAccessor};
//! use std::path::Path;
//!
//! let index = CatalogIndex::load_from_file(Path::new("data/snapshot.json"))?;
//! let history = index.history("ana");
//! println!("ana has {} ratings", history.ratings.len());
//! ```

pub mod accessor;
pub mod error;
pub mod index;
pub mod names;
pub mod snapshot;
pub mod types;

// Re-export commonly used types for convenience
pub use accessor::{CatalogAccessor, HistoryAccessor};
pub use error::{CatalogError, Result};
pub use names::{country_name, genre_label, genre_name, language_name};
pub use snapshot::CatalogSnapshot;
pub use types::{
    // Type aliases
    ItemId,
    UserId,
    ANONYMOUS_USER,
    // Core types
    CatalogIndex,
    CatalogItem,
    ExplicitRating,
    ImplicitSignal,
    MediaType,
    UserHistory,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_index_creation() {
        let index = CatalogIndex::new();
        let (items, ratings, signals) = index.counts();

        assert_eq!(items, 0);
        assert_eq!(ratings, 0);
        assert_eq!(signals, 0);
    }

    #[test]
    fn test_insert_item() {
        let mut index = CatalogIndex::new();

        let item = CatalogItem::new(550, MediaType::Movie, "Fight Club")
            .with_genres([18])
            .with_release_year(1999)
            .with_runtime(139);

        index.insert_item(item);

        let retrieved = index.get_item(550).unwrap();
        assert_eq!(retrieved.title, "Fight Club");
        assert_eq!(retrieved.release_year, Some(1999));
        assert_eq!(retrieved.genre_ids, vec![18]);
    }

    #[test]
    fn test_rating_normalization() {
        assert_eq!(ExplicitRating::new("ana", 1, 85.0).normalized(), 8.5);
        assert_eq!(ExplicitRating::new("ana", 1, 0.0).normalized(), 0.0);
        assert_eq!(ExplicitRating::new("ana", 1, 100.0).normalized(), 10.0);
    }

    #[test]
    fn test_media_type_parsing() {
        assert_eq!("Movie".parse::<MediaType>().unwrap(), MediaType::Movie);
        assert_eq!("tv".parse::<MediaType>().unwrap(), MediaType::Show);
        assert!("game".parse::<MediaType>().is_err());
        assert_eq!(MediaType::Podcast.plural(), "podcasts");
    }

    #[test]
    fn test_empty_queries() {
        let index = CatalogIndex::new();

        assert!(index.get_item(999).is_none());
        assert!(index.get_user_ratings("nobody").is_empty());
        assert!(index.get_user_signals("nobody").is_empty());
        assert!(index.get_items_by_media(MediaType::Movie).is_empty());
        assert!(index.history("nobody").is_empty());
        assert_eq!(index.generation("nobody"), 0);
    }
}
