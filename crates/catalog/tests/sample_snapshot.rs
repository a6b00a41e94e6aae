//! Loads the sample snapshot shipped with the repository.

use catalog::snapshot::parse_snapshot;
use catalog::{ANONYMOUS_USER, CatalogIndex, HistoryAccessor, MediaType};
use std::path::PathBuf;

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/sample_snapshot.json")
}

#[test]
fn test_sample_snapshot_loads() {
    let index = CatalogIndex::load_from_file(&sample_path()).unwrap();

    assert_eq!(index.counts(), (10, 9, 3));
    assert_eq!(index.get_items_by_media(MediaType::Movie).len(), 6);
    assert_eq!(index.get_items_by_media(MediaType::Show), &[10, 11]);
    assert_eq!(index.get_items_by_media(MediaType::Podcast), &[30]);

    let podcast = index.get_item(30).unwrap();
    assert!(podcast.talent.is_empty());
    assert_eq!(podcast.release_year, None);
}

#[test]
fn test_sample_history_includes_anonymous_records() {
    let index = CatalogIndex::load_from_file(&sample_path()).unwrap();

    let history = index.history("ana");
    assert_eq!(history.ratings.len(), 5);
    assert_eq!(history.signals.len(), 1);
    assert_eq!(history.ratings[0].user_id, "ana");
    assert_eq!(history.ratings.last().unwrap().user_id, ANONYMOUS_USER);
}

#[test]
fn test_sample_round_trips_through_export() {
    let index = CatalogIndex::load_from_file(&sample_path()).unwrap();
    let json = serde_json::to_string(&index.to_snapshot()).unwrap();

    let reloaded = CatalogIndex::from_snapshot(parse_snapshot(&json).unwrap()).unwrap();
    assert_eq!(reloaded.counts(), index.counts());
    assert_eq!(reloaded.get_item(1), index.get_item(1));
}
