//! Batch prediction: one profile, many candidates.
//!
//! The user's history is aggregated once, then every candidate is scored
//! in parallel against the shared profile. Per-item cost depends only on
//! how many attribute keys the item has.

use crate::combiner::PredictionResult;
use crate::predictor::PreferencePredictor;
use catalog::{CatalogItem, ItemId};
use rayon::prelude::*;
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, instrument};

/// One entry of a ranked candidate list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedItem {
    pub item_id: ItemId,
    pub result: PredictionResult,
}

impl PreferencePredictor {
    /// Predict every item for one user.
    ///
    /// Duplicate ids collapse into one entry.
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub fn predict_batch<T>(&self, items: &[T], user_id: &str) -> HashMap<ItemId, PredictionResult>
    where
        T: Borrow<CatalogItem> + Sync,
    {
        let start = Instant::now();
        let profile = self.profile(user_id);

        let results: HashMap<ItemId, PredictionResult> = items
            .par_iter()
            .map(|item| {
                let item = item.borrow();
                (item.id, self.predict_with_profile(item, &profile))
            })
            .collect();

        debug!(
            "Scored {} items for {} in {:?}",
            results.len(),
            user_id,
            start.elapsed()
        );
        results
    }

    /// Predict and order: best score first, ties by confidence, then id.
    pub fn rank<T>(&self, items: &[T], user_id: &str, limit: usize) -> Vec<RankedItem>
    where
        T: Borrow<CatalogItem> + Sync,
    {
        let mut ranked: Vec<RankedItem> = self
            .predict_batch(items, user_id)
            .into_iter()
            .map(|(item_id, result)| RankedItem { item_id, result })
            .collect();

        ranked.sort_by(|a, b| {
            b.result
                .score
                .total_cmp(&a.result.score)
                .then_with(|| b.result.confidence.total_cmp(&a.result.confidence))
                .then_with(|| a.item_id.cmp(&b.item_id))
        });
        ranked.truncate(limit);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::predictor::PreferencePredictor;
    use catalog::{CatalogIndex, CatalogItem, ExplicitRating, MediaType};
    use std::sync::Arc;

    fn create_test_index() -> CatalogIndex {
        let mut index = CatalogIndex::new();
        for (id, genre) in [(1, 28), (2, 28), (3, 35), (4, 35)] {
            index.insert_item(CatalogItem::new(id, MediaType::Movie, format!("Movie {id}")).with_genres([genre]));
        }
        index.insert_rating(ExplicitRating::new("ana", 1, 90.0));
        index.insert_rating(ExplicitRating::new("ana", 3, 30.0));
        index
    }

    #[test]
    fn test_batch_matches_single_predictions() {
        let index = Arc::new(create_test_index());
        let candidates: Vec<CatalogItem> = vec![
            index.get_item(2).unwrap().clone(),
            index.get_item(4).unwrap().clone(),
        ];
        let predictor = PreferencePredictor::new(index.clone(), index, EngineConfig::new(2025));

        let batch = predictor.predict_batch(&candidates, "ana");
        assert_eq!(batch.len(), 2);
        for item in &candidates {
            assert_eq!(batch[&item.id], predictor.predict(item, "ana"));
        }
    }

    #[test]
    fn test_rank_orders_and_limits() {
        let index = Arc::new(create_test_index());
        let candidates: Vec<&CatalogItem> = index.items();
        let predictor = PreferencePredictor::new(index.clone(), index.clone(), EngineConfig::new(2025));

        let ranked = predictor.rank(&candidates, "ana", 3);
        assert_eq!(ranked.len(), 3);
        // Action items first, lower id breaks the tie
        assert_eq!(ranked[0].item_id, 1);
        assert_eq!(ranked[1].item_id, 2);
        assert!(ranked.windows(2).all(|w| w[0].result.score >= w[1].result.score));

        assert!(predictor.rank(&candidates, "ana", 0).is_empty());
    }
}
