//! # Prediction Service
//!
//! Runs engine calls off the async executor:
//! 1. Move the request onto the blocking pool with `spawn_blocking`
//! 2. Optionally bound the wait with `tokio::time::timeout`
//! 3. Log how long the call took
//!
//! A timed-out call stops being awaited but the blocking task still runs
//! to completion; engine calls are short and side-effect free.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use catalog::{CatalogItem, ItemId};
use engine::{Comparison, PredictionResult, PreferencePredictor, RankedItem};

use crate::error::{Result, ServiceError};

/// Async entry point to a shared `PreferencePredictor`
#[derive(Clone)]
pub struct PredictionService {
    predictor: Arc<PreferencePredictor>,
    timeout: Option<Duration>,
}

impl PredictionService {
    pub fn new(predictor: Arc<PreferencePredictor>) -> Self {
        Self {
            predictor,
            timeout: None,
        }
    }

    /// Fail calls that take longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn predictor(&self) -> &Arc<PreferencePredictor> {
        &self.predictor
    }

    /// Predict one item for one user
    pub async fn predict(
        &self,
        item: CatalogItem,
        user_id: impl Into<String>,
    ) -> Result<PredictionResult> {
        let user_id = user_id.into();
        let item_id = item.id;
        let result = self
            .run("predict", move |predictor| predictor.predict(&item, &user_id))
            .await?;
        info!(
            "Predicted item {}: {:.1} (confidence {:.2})",
            item_id, result.score, result.confidence
        );
        Ok(result)
    }

    /// Predict many items for one user; the profile is built once
    pub async fn predict_batch(
        &self,
        items: Vec<CatalogItem>,
        user_id: impl Into<String>,
    ) -> Result<HashMap<ItemId, PredictionResult>> {
        let user_id = user_id.into();
        let count = items.len();
        let results = self
            .run("predict_batch", move |predictor| {
                predictor.predict_batch(&items, &user_id)
            })
            .await?;
        info!("Predicted {} of {} items", results.len(), count);
        Ok(results)
    }

    /// Best `limit` items for one user
    pub async fn rank(
        &self,
        items: Vec<CatalogItem>,
        user_id: impl Into<String>,
        limit: usize,
    ) -> Result<Vec<RankedItem>> {
        let user_id = user_id.into();
        self.run("rank", move |predictor| {
            predictor.rank(&items, &user_id, limit)
        })
        .await
    }

    /// Predict the same item for a user and a friend
    pub async fn compare(
        &self,
        item: CatalogItem,
        user_id: impl Into<String>,
        friend_id: impl Into<String>,
    ) -> Result<Comparison> {
        let user_id = user_id.into();
        let friend_id = friend_id.into();
        self.run("compare", move |predictor| {
            predictor.compare(&item, &user_id, &friend_id)
        })
        .await
    }

    /// Run `job` on the blocking pool, bounded by the configured timeout
    async fn run<T, F>(&self, operation: &'static str, job: F) -> Result<T>
    where
        F: FnOnce(&PreferencePredictor) -> T + Send + 'static,
        T: Send + 'static,
    {
        let start_time = Instant::now();
        let predictor = self.predictor.clone();
        let task = tokio::task::spawn_blocking(move || job(&predictor));

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined?,
                Err(_) => {
                    warn!("{} exceeded {:?}", operation, limit);
                    return Err(ServiceError::TimedOut(limit));
                }
            },
            None => task.await?,
        };

        info!("{} finished in {:.2?}", operation, start_time.elapsed());
        Ok(output)
    }
}
