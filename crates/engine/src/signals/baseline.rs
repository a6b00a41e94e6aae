use super::{ScoringContext, Signal, SignalScorer};
use crate::config::ScoringMethod;

const CONSISTENT_STD_DEV: f32 = 1.0;
const CONSISTENCY_NUDGE: f32 = 0.5;

/// The user's own average rating.
///
/// Restricted to the candidate's media type when the user has rated any
/// of it. A consistent rater (std-dev <= 1) gets +0.5, since their average
/// undersells what they actually like.
pub struct PersonalBaselineScorer;

impl SignalScorer for PersonalBaselineScorer {
    fn method(&self) -> ScoringMethod {
        ScoringMethod::PersonalBaseline
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Option<Signal> {
        let media_type = ctx.item.media_type;
        let same_media = ctx.profile.ratings_for(media_type);
        let all;
        let (ratings, scope) = if same_media.is_empty() {
            all = ctx.profile.all_ratings();
            (all.as_slice(), "overall")
        } else {
            (same_media, media_type.plural())
        };
        if ratings.is_empty() {
            return None;
        }

        let n = ratings.len() as f32;
        let mean = ratings.iter().sum::<f32>() / n;
        let std_dev = (ratings.iter().map(|r| (r - mean).powi(2)).sum::<f32>() / n).sqrt();
        let score = if std_dev <= CONSISTENT_STD_DEV {
            mean + CONSISTENCY_NUDGE
        } else {
            mean
        };

        // Fixed weight: confidence 1.0 times the 1.0 multiplier
        Some(Signal::new(
            ScoringMethod::PersonalBaseline,
            score,
            1.0,
            format!("Your average rating for {scope}: {mean:.1}"),
        ))
    }
}
