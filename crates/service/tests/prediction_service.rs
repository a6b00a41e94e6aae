use std::sync::Arc;
use std::time::Duration;

use catalog::{CatalogIndex, CatalogItem, ExplicitRating, HistoryAccessor, MediaType, UserHistory};
use engine::{EngineConfig, PreferencePredictor};
use service::{PredictionService, ServiceError};

fn create_test_index() -> CatalogIndex {
    let mut index = CatalogIndex::new();
    index.insert_item(
        CatalogItem::new(1, MediaType::Movie, "Paddington")
            .with_genres([35, 10751])
            .with_critics(Some("7.3"), Some("77"), Some("97%")),
    );
    index.insert_item(CatalogItem::new(2, MediaType::Movie, "Paddington 2").with_genres([35, 10751]));
    index.insert_item(CatalogItem::new(3, MediaType::Movie, "Saw").with_genres([27]));
    index.insert_rating(ExplicitRating::new("ana", 1, 90.0));
    index.insert_rating(ExplicitRating::new("ana", 3, 20.0));
    index
}

fn build_test_service() -> (PredictionService, Arc<CatalogIndex>) {
    let index = Arc::new(create_test_index());
    let predictor = PreferencePredictor::new(index.clone(), index.clone(), EngineConfig::new(2025));
    (PredictionService::new(Arc::new(predictor)), index)
}

/// History accessor that takes its time
struct SlowHistory;

impl HistoryAccessor for SlowHistory {
    fn history(&self, _user_id: &str) -> UserHistory {
        std::thread::sleep(Duration::from_millis(200));
        UserHistory::default()
    }

    fn generation(&self, _user_id: &str) -> u64 {
        0
    }
}

#[tokio::test]
async fn test_predict_matches_engine() {
    let (service, index) = build_test_service();
    let item = index.get_item(2).unwrap().clone();

    let result = service.predict(item.clone(), "ana").await.unwrap();
    assert_eq!(result, service.predictor().predict(&item, "ana"));
    assert!((1.0..=10.0).contains(&result.score));
}

#[tokio::test]
async fn test_no_history_fallback() {
    let (service, index) = build_test_service();
    let item = index.get_item(1).unwrap().clone();

    let result = service.predict(item, "nobody").await.unwrap();
    assert_eq!(result.confidence, 0.2);
    assert!((result.score - (7.3 + 7.7 + 9.7) / 3.0).abs() < 1e-5);
}

#[tokio::test]
async fn test_batch_and_rank() {
    let (service, index) = build_test_service();
    let items: Vec<CatalogItem> = index.items().into_iter().cloned().collect();

    let batch = service.predict_batch(items.clone(), "ana").await.unwrap();
    assert_eq!(batch.len(), 3);

    let ranked = service.rank(items, "ana", 2).await.unwrap();
    assert_eq!(ranked.len(), 2);
    assert_ne!(ranked[0].item_id, 3);
    assert_eq!(batch[&ranked[0].item_id], ranked[0].result);
}

#[tokio::test]
async fn test_concurrent_compare() {
    let (service, index) = build_test_service();
    let item = index.get_item(2).unwrap().clone();

    let (comparison, again) = tokio::join!(
        service.compare(item.clone(), "ana", "nobody"),
        service.compare(item, "ana", "nobody")
    );
    let comparison = comparison.unwrap();
    assert_eq!(comparison, again.unwrap());
    assert_eq!(comparison.friend.confidence, 0.2);
}

#[tokio::test]
async fn test_timeout() {
    let index = Arc::new(create_test_index());
    let predictor = PreferencePredictor::new(index.clone(), Arc::new(SlowHistory), EngineConfig::new(2025));
    let service = PredictionService::new(Arc::new(predictor)).with_timeout(Duration::from_millis(10));

    let item = index.get_item(1).unwrap().clone();
    let err = service.predict(item, "ana").await.unwrap_err();
    assert!(matches!(err, ServiceError::TimedOut(limit) if limit == Duration::from_millis(10)));
}
