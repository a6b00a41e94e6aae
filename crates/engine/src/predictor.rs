//! Single-item prediction and the shared scoring pass.
//!
//! Every prediction, single or batch, goes through `predict_with_profile`,
//! so the two paths cannot drift apart. They differ only in how the taste
//! profile is obtained.

use crate::cache::{CacheStats, ProfileCache};
use crate::combiner::{
    CRITIC_FALLBACK_REASON, CROSS_MEDIA_CONFIDENCE, Combiner, NO_HISTORY_CONFIDENCE,
    PredictionResult,
};
use crate::config::{EngineConfig, ScoringMethod};
use crate::profile::{TasteProfile, build_taste_profile};
use crate::signals::{ScorerSet, ScoringContext, critic_consensus};
use catalog::{CatalogAccessor, CatalogItem, HistoryAccessor};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Scores within this distance count as agreeing
const AGREEMENT_MARGIN: f32 = 1.0;

/// Side-by-side prediction for two identities
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub user: PredictionResult,
    pub friend: PredictionResult,
    /// `user.score - friend.score`
    pub difference: f32,
    pub agrees: bool,
}

/// Predicts how much a user will enjoy catalog items.
///
/// Accessors are injected, so the predictor works against any catalog or
/// history store. Cheap to share behind an `Arc`; all methods take `&self`.
///
/// ```ignore
/// let predictor = PreferencePredictor::new(catalog, history, EngineConfig::new(2025));
/// let result = predictor.predict(&item, "ana");
/// ```
pub struct PreferencePredictor {
    catalog: Arc<dyn CatalogAccessor>,
    history: Arc<dyn HistoryAccessor>,
    config: EngineConfig,
    scorers: ScorerSet,
    combiner: Combiner,
    cache: ProfileCache,
}

impl PreferencePredictor {
    pub fn new(
        catalog: Arc<dyn CatalogAccessor>,
        history: Arc<dyn HistoryAccessor>,
        config: EngineConfig,
    ) -> Self {
        Self {
            catalog,
            history,
            combiner: Combiner::new(config.weights.clone(), config.trace),
            cache: ProfileCache::new(config.cache_capacity),
            scorers: ScorerSet::default(),
            config,
        }
    }

    /// Replace the default scorer lineup (builder pattern)
    pub fn with_scorers(mut self, scorers: ScorerSet) -> Self {
        self.scorers = scorers;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Taste profile for `user_id`, from the cache when its history has
    /// not changed
    pub fn profile(&self, user_id: &str) -> Arc<TasteProfile> {
        let generation = self.history.generation(user_id);
        self.cache.get_or_build(user_id, generation, || {
            let history = self.history.history(user_id);
            build_taste_profile(user_id, &history, self.catalog.as_ref(), &self.config)
        })
    }

    /// Predict one item for one user
    pub fn predict(&self, item: &CatalogItem, user_id: &str) -> PredictionResult {
        let profile = self.profile(user_id);
        self.predict_with_profile(item, &profile)
    }

    /// Score one item against an already built profile.
    ///
    /// ## Algorithm
    /// 1. No history at all: critic consensus, confidence 0.2
    /// 2. No explicit ratings of this media type: critic consensus,
    ///    confidence 0.25, plus a prompt to rate some
    /// 3. Otherwise run every scorer and combine
    pub fn predict_with_profile(&self, item: &CatalogItem, profile: &TasteProfile) -> PredictionResult {
        if !profile.has_history() {
            return self.combiner.fallback(
                critic_consensus(item),
                NO_HISTORY_CONFIDENCE,
                vec![CRITIC_FALLBACK_REASON.to_string()],
            );
        }

        let same_media = profile.explicit_count_for(item.media_type);
        if same_media == 0 {
            return self.combiner.fallback(
                critic_consensus(item),
                CROSS_MEDIA_CONFIDENCE,
                vec![
                    CRITIC_FALLBACK_REASON.to_string(),
                    format!(
                        "Rate a few {} to get personalized predictions",
                        item.media_type.plural()
                    ),
                ],
            );
        }

        let ctx = ScoringContext::new(item, profile, &self.config);
        let signals = self.scorers.collect(&ctx);

        let matched = |method: ScoringMethod| signals.iter().any(|s| s.method == method) as usize;
        let data_points =
            same_media + matched(ScoringMethod::Genre) + matched(ScoringMethod::Talent);

        debug!(
            "Item {} for {}: {} signals, {} data points",
            item.id,
            profile.user_id,
            signals.len(),
            data_points
        );

        self.combiner
            .combine(signals, data_points)
            .unwrap_or_else(|| {
                self.combiner.fallback(
                    critic_consensus(item),
                    NO_HISTORY_CONFIDENCE,
                    vec![CRITIC_FALLBACK_REASON.to_string()],
                )
            })
    }

    /// Predict the same item for two identities
    pub fn compare(&self, item: &CatalogItem, user_id: &str, friend_id: &str) -> Comparison {
        let user = self.predict(item, user_id);
        let friend = self.predict(item, friend_id);
        let difference = user.score - friend.score;
        Comparison {
            agrees: difference.abs() <= AGREEMENT_MARGIN,
            difference,
            user,
            friend,
        }
    }

    /// Forget the cached profile for one user
    pub fn invalidate(&self, user_id: &str) -> bool {
        self.cache.invalidate(user_id)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
