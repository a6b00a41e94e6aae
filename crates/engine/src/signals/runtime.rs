use super::{ScoringContext, Signal, SignalScorer};
use crate::attributes::{AttributeKey, RuntimeBucket};
use crate::config::ScoringMethod;

/// How the user rates items of similar length
pub struct RuntimeScorer;

impl SignalScorer for RuntimeScorer {
    fn method(&self) -> ScoringMethod {
        ScoringMethod::Runtime
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Option<Signal> {
        let bucket = RuntimeBucket::from_minutes(ctx.item.runtime_minutes?);
        let stats = ctx.stats(&AttributeKey::Runtime(bucket))?;
        let confidence = (stats.count as f32 / 5.0).min(0.7);

        Some(Signal::new(
            ScoringMethod::Runtime,
            stats.mean,
            confidence,
            format!("You like {} runtimes", bucket.as_str()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::test_support::{config, profile_with};
    use catalog::{CatalogItem, MediaType};

    fn lasting(id: u32, minutes: u32) -> CatalogItem {
        CatalogItem::new(id, MediaType::Movie, format!("Film {id}")).with_runtime(minutes)
    }

    #[test]
    fn test_bucket_lookup() {
        let profile = profile_with(
            vec![lasting(1, 160), lasting(2, 200), lasting(3, 95)],
            &[(1, 90.0), (2, 80.0), (3, 30.0)],
        );
        let config = config();
        let candidate = lasting(10, 175);
        let ctx = ScoringContext::new(&candidate, &profile, &config);

        let signal = RuntimeScorer.score(&ctx).unwrap();
        assert!((signal.score - 8.5).abs() < 1e-5);
        assert!((signal.confidence - 0.4).abs() < 1e-6);
        assert_eq!(signal.label, "You like epic runtimes");
    }

    #[test]
    fn test_confidence_is_capped() {
        let items: Vec<CatalogItem> = (1..=8).map(|id| lasting(id, 100)).collect();
        let ratings: Vec<(u32, f32)> = (1..=8).map(|id| (id, 70.0)).collect();
        let profile = profile_with(items, &ratings);
        let config = config();
        let candidate = lasting(10, 110);
        let ctx = ScoringContext::new(&candidate, &profile, &config);

        assert_eq!(RuntimeScorer.score(&ctx).unwrap().confidence, 0.7);
    }

    #[test]
    fn test_unmatched_bucket() {
        let profile = profile_with(vec![lasting(1, 60)], &[(1, 90.0)]);
        let config = config();
        let candidate = lasting(10, 130);
        let ctx = ScoringContext::new(&candidate, &profile, &config);
        assert!(RuntimeScorer.score(&ctx).is_none());
    }
}
