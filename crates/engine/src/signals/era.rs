use super::{ScoringContext, Signal, SignalScorer};
use crate::attributes::{AgeBucket, AttributeKey, decade_of};
use crate::config::ScoringMethod;
use crate::profile::{Sample, SampleStats};

/// Decade and age-bucket samples pooled into one average
pub struct EraScorer;

impl SignalScorer for EraScorer {
    fn method(&self) -> ScoringMethod {
        ScoringMethod::Era
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Option<Signal> {
        let year = ctx.item.release_year?;
        let decade = decade_of(year);
        let age = AgeBucket::from_age(ctx.config.reference_year as i32 - year as i32);

        let pooled: Vec<Sample> = [AttributeKey::Decade(decade), AttributeKey::Age(age)]
            .iter()
            .filter_map(|key| ctx.profile.attributes.get(key))
            .flatten()
            .copied()
            .collect();

        let stats = SampleStats::from_samples(
            &pooled,
            ctx.item.media_type,
            ctx.config.cross_media_weight,
        )?;
        let confidence = (stats.count as f32 / 5.0).min(0.8);

        Some(Signal::new(
            ScoringMethod::Era,
            stats.mean,
            confidence,
            format!("Made in the {decade}s"),
        ))
    }
}
