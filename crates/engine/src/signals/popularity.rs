use super::{ScoringContext, Signal, SignalScorer};
use crate::attributes::{AttributeKey, PopularityTier};
use crate::config::ScoringMethod;

/// Blockbuster versus indie preference
pub struct PopularityScorer;

impl SignalScorer for PopularityScorer {
    fn method(&self) -> ScoringMethod {
        ScoringMethod::Popularity
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Option<Signal> {
        let popularity = ctx.item.popularity.filter(|p| p.is_finite())?;
        let tier = PopularityTier::from_popularity(popularity);
        let stats = ctx.stats(&AttributeKey::Popularity(tier))?;
        let confidence = (stats.count as f32 / 5.0).min(0.6);

        let label = match tier {
            PopularityTier::Blockbuster => "You rate blockbusters".to_string(),
            PopularityTier::Indie => "You rate indie picks".to_string(),
            other => format!("You rate {} titles", other.as_str()),
        };
        Some(Signal::new(ScoringMethod::Popularity, stats.mean, confidence, label))
    }
}
