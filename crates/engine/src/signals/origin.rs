use super::{ScoringContext, Signal, SignalScorer, weighted_mean};
use crate::attributes::AttributeKey;
use crate::config::ScoringMethod;
use catalog::{country_name, language_name};

const LANGUAGE_MULTIPLIER: f32 = 1.5;

/// Original language and production countries.
///
/// A language match counts 1.5x a country match.
pub struct OriginScorer;

impl SignalScorer for OriginScorer {
    fn method(&self) -> ScoringMethod {
        ScoringMethod::Origin
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Option<Signal> {
        let weighted: Vec<(&AttributeKey, f32, f32)> = ctx
            .matched(|key| matches!(key, AttributeKey::Language(_) | AttributeKey::Country(_)))
            .into_iter()
            .map(|(key, stats)| {
                let weight = match key {
                    AttributeKey::Language(_) => stats.weight * LANGUAGE_MULTIPLIER,
                    _ => stats.weight,
                };
                (key, stats.mean, weight)
            })
            .collect();

        let score = weighted_mean(weighted.iter().map(|(_, mean, weight)| (*mean, *weight)))?;
        let confidence = (weighted.len() as f32 / 3.0).min(0.8);

        let mut top: Option<(&AttributeKey, f32)> = None;
        for (key, _, weight) in &weighted {
            if top.is_none_or(|(_, best)| *weight > best) {
                top = Some((*key, *weight));
            }
        }
        let label = match top.map(|(key, _)| key) {
            Some(AttributeKey::Language(code)) => format!("{} language", language_name(code)),
            Some(AttributeKey::Country(code)) => format!("From {}", country_name(code)),
            _ => "Origins you enjoy".to_string(),
        };

        Some(Signal::new(ScoringMethod::Origin, score, confidence, label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::test_support::{config, profile_with};
    use catalog::{CatalogItem, MediaType};

    fn made_in(id: u32, language: &str, countries: &[&str]) -> CatalogItem {
        CatalogItem::new(id, MediaType::Movie, format!("Film {id}"))
            .with_language(language)
            .with_countries(countries.iter().copied())
    }

    #[test]
    fn test_language_outweighs_country() {
        let profile = profile_with(
            vec![made_in(1, "ko", &["KR"]), made_in(2, "en", &["KR"])],
            &[(1, 90.0), (2, 50.0)],
        );
        let config = config();
        let candidate = made_in(10, "ko", &["KR"]);
        let ctx = ScoringContext::new(&candidate, &profile, &config);

        let signal = OriginScorer.score(&ctx).unwrap();
        // korean: 9.0 x1.5; KR: 7.0 x2
        let expected = (9.0 * 1.5 + 7.0 * 2.0) / 3.5;
        assert!((signal.score - expected).abs() < 1e-5);
        assert!((signal.confidence - 2.0 / 3.0).abs() < 1e-6);
        // KR carries two samples, so it is the heaviest match
        assert_eq!(signal.label, "From South Korea");
    }

    #[test]
    fn test_language_label_and_cap() {
        let profile = profile_with(vec![made_in(1, "fr", &["FR", "BE", "CA"])], &[(1, 80.0)]);
        let config = config();
        let candidate = made_in(10, "FR", &["fr", "be", "ca"]);
        let ctx = ScoringContext::new(&candidate, &profile, &config);

        let signal = OriginScorer.score(&ctx).unwrap();
        assert_eq!(signal.score, 8.0);
        assert_eq!(signal.confidence, 0.8);
        assert_eq!(signal.label, "French language");
    }

    #[test]
    fn test_no_origin_match() {
        let profile = profile_with(vec![made_in(1, "en", &["US"])], &[(1, 80.0)]);
        let config = config();
        let candidate = made_in(10, "ja", &["JP"]);
        let ctx = ScoringContext::new(&candidate, &profile, &config);
        assert!(OriginScorer.score(&ctx).is_none());
    }
}
