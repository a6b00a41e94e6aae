use super::{ScoringContext, Signal, SignalScorer};
use crate::attributes::{AttributeKey, CommunityTier, trusted_vote_average};
use crate::config::ScoringMethod;

/// Crowd average the user's bias is measured against
const BIAS_PIVOT: f32 = 7.0;
const BIAS_FACTOR: f32 = 0.3;
const BIAS_CONFIDENCE: f32 = 0.3;
/// Secondary signal, never trusted much
const TIER_CONFIDENCE_CAP: f32 = 0.5;

/// The community vote average, as this user tends to read it.
///
/// Uses the user's own ratings of items in the same vote tier when there
/// are any. Otherwise nudges the raw vote average by how far the user's
/// ratings of well-voted items sit from 7.0.
pub struct CommunityRatingScorer;

impl SignalScorer for CommunityRatingScorer {
    fn method(&self) -> ScoringMethod {
        ScoringMethod::CommunityRating
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Option<Signal> {
        let average = trusted_vote_average(ctx.item)?;
        let tier = CommunityTier::from_average(average);

        if let Some(stats) = ctx.stats(&AttributeKey::CommunityRating(tier)) {
            let confidence = (stats.count as f32 / 6.0).min(TIER_CONFIDENCE_CAP);
            return Some(Signal::new(
                ScoringMethod::CommunityRating,
                stats.mean,
                confidence,
                format!("You like {}-rated titles", tier.as_str()),
            ));
        }

        let bias = ctx.stats(&AttributeKey::CommunityBias)?;
        let score = average + (bias.mean - BIAS_PIVOT) * BIAS_FACTOR;
        Some(Signal::new(
            ScoringMethod::CommunityRating,
            score,
            BIAS_CONFIDENCE,
            format!("Community rating {average:.1}/10"),
        ))
    }
}
