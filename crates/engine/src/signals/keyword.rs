use super::{LIKE_THRESHOLD, ScoringContext, Signal, SignalScorer, weighted_mean};
use crate::attributes::AttributeKey;
use crate::config::ScoringMethod;

/// Free-text themes the user has rated before, each weighted by its
/// sample weight
pub struct KeywordScorer;

impl SignalScorer for KeywordScorer {
    fn method(&self) -> ScoringMethod {
        ScoringMethod::Keyword
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Option<Signal> {
        let matched = ctx.matched(|key| matches!(key, AttributeKey::Keyword(_)));
        let score = weighted_mean(matched.iter().map(|(_, s)| (s.mean, s.weight)))?;
        let confidence = (matched.len() as f32 / 3.0).min(1.0);

        let likes = score >= LIKE_THRESHOLD;
        let label = if matched.len() > 2 {
            let verb = if likes { "like" } else { "dislike" };
            format!("Matches {} themes you {verb}", matched.len())
        } else {
            // Heaviest keyword; ties keep the earlier (alphabetical) key
            let mut top = None;
            for (key, stats) in &matched {
                if top.is_none_or(|(_, weight)| stats.weight > weight) {
                    top = Some((*key, stats.weight));
                }
            }
            match top.map(|(key, _)| key) {
                Some(AttributeKey::Keyword(word)) => format!("Theme: {word}"),
                _ if likes => "Themes you like".to_string(),
                _ => "Themes you dislike".to_string(),
            }
        };

        Some(Signal::new(ScoringMethod::Keyword, score, confidence, label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::test_support::{config, profile_with};
    use catalog::{CatalogItem, MediaType};

    fn tagged(id: u32, keywords: &[&str]) -> CatalogItem {
        CatalogItem::new(id, MediaType::Movie, format!("Film {id}"))
            .with_keywords(keywords.iter().copied())
    }

    #[test]
    fn test_keywords_weighted_by_sample_count() {
        let profile = profile_with(
            vec![
                tagged(1, &["heist"]),
                tagged(2, &["heist"]),
                tagged(3, &["space"]),
            ],
            &[(1, 90.0), (2, 70.0), (3, 50.0)],
        );
        let config = config();
        let candidate = tagged(10, &["Heist", "space", "robots"]);
        let ctx = ScoringContext::new(&candidate, &profile, &config);

        let signal = KeywordScorer.score(&ctx).unwrap();
        // heist 8.0 x2, space 5.0 x1
        assert!((signal.score - 7.0).abs() < 1e-5);
        assert!((signal.confidence - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(signal.label, "Theme: heist");
    }

    #[test]
    fn test_many_matches_get_a_count_label() {
        let profile = profile_with(vec![tagged(1, &["a", "b", "c", "d"])], &[(1, 80.0)]);
        let config = config();
        let candidate = tagged(10, &["a", "b", "c", "d"]);
        let ctx = ScoringContext::new(&candidate, &profile, &config);

        let signal = KeywordScorer.score(&ctx).unwrap();
        assert_eq!(signal.confidence, 1.0);
        assert_eq!(signal.label, "Matches 4 themes you like");
    }

    #[test]
    fn test_count_label_follows_score() {
        let profile = profile_with(vec![tagged(1, &["a", "b", "c"])], &[(1, 20.0)]);
        let config = config();
        let candidate = tagged(10, &["a", "b", "c"]);
        let ctx = ScoringContext::new(&candidate, &profile, &config);

        let signal = KeywordScorer.score(&ctx).unwrap();
        assert!((signal.score - 2.0).abs() < 1e-5);
        assert_eq!(signal.label, "Matches 3 themes you dislike");
    }

    #[test]
    fn test_no_keywords() {
        let profile = profile_with(vec![tagged(1, &["heist"])], &[(1, 80.0)]);
        let config = config();
        let candidate = tagged(10, &[]);
        let ctx = ScoringContext::new(&candidate, &profile, &config);
        assert!(KeywordScorer.score(&ctx).is_none());
    }
}
