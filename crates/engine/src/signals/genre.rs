//! Genre signal: how the user rates the candidate's genres and genre pairs.

use super::{LIKE_THRESHOLD, ScoringContext, Signal, SignalScorer, weighted_mean};
use crate::attributes::AttributeKey;
use crate::config::ScoringMethod;
use catalog::genre_label;

/// Combo matches count this many times a plain genre match
const COMBO_MULTIPLIER: f32 = 3.0;
/// Genres rated consistently (variance below this) get extra weight
const CONSISTENT_VARIANCE: f32 = 1.0;
const CONSISTENCY_BONUS: f32 = 1.5;
/// Extreme genre averages pull the blend 60% of the way toward them
const EXTREMITY_PULL: f32 = 0.6;
const EXTREMITY_GAP: f32 = 1.0;
const STRONG_LIKE: f32 = 8.0;
const STRONG_DISLIKE: f32 = 4.0;

/// Blends per-genre and per-genre-pair averages.
///
/// ## Algorithm
/// 1. Each matched genre weighs its sample weight, x1.5 when the user's
///    ratings in it are consistent
/// 2. Each matched genre pair weighs 3x its sample weight
/// 3. If one genre is loved (>8, more than 1 point above the blend) or
///    hated (<4, more than 1 point below), lean 60% toward it
pub struct GenreScorer;

impl SignalScorer for GenreScorer {
    fn method(&self) -> ScoringMethod {
        ScoringMethod::Genre
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Option<Signal> {
        let genres = ctx.matched(|key| matches!(key, AttributeKey::Genre(_)));
        let combos = ctx.matched(|key| matches!(key, AttributeKey::GenreCombo(..)));
        if genres.is_empty() && combos.is_empty() {
            return None;
        }

        let genre_weight = |variance: f32, weight: f32| {
            if variance < CONSISTENT_VARIANCE {
                weight * CONSISTENCY_BONUS
            } else {
                weight
            }
        };

        let pairs = genres
            .iter()
            .map(|(_, stats)| (stats.mean, genre_weight(stats.variance, stats.weight)))
            .chain(
                combos
                    .iter()
                    .map(|(_, stats)| (stats.mean, stats.weight * COMBO_MULTIPLIER)),
            );
        let mut score = weighted_mean(pairs)?;

        let max = genres.iter().map(|(_, s)| s.mean).fold(f32::NEG_INFINITY, f32::max);
        let min = genres.iter().map(|(_, s)| s.mean).fold(f32::INFINITY, f32::min);
        if max > STRONG_LIKE && max - score > EXTREMITY_GAP {
            score += (max - score) * EXTREMITY_PULL;
        } else if min < STRONG_DISLIKE && score - min > EXTREMITY_GAP {
            score += (min - score) * EXTREMITY_PULL;
        }

        let matched = genres.len() + combos.len();
        let confidence = (matched as f32 / 4.0).min(1.0);

        // Name the genres that carry the most evidence
        let mut named: Vec<(u32, f32)> = genres
            .iter()
            .filter_map(|(key, stats)| match key {
                AttributeKey::Genre(id) => Some((*id, stats.weight)),
                _ => None,
            })
            .collect();
        named.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        let names: Vec<String> = named.iter().take(2).map(|(id, _)| genre_label(*id)).collect();

        let likes = score >= LIKE_THRESHOLD;
        let label = match (names.is_empty(), likes) {
            (true, true) => "Genre mix you rate well".to_string(),
            (true, false) => "Genre mix you rate poorly".to_string(),
            (false, true) => format!("You enjoy {}", names.join(" & ")),
            (false, false) => format!("You tend to dislike {}", names.join(" & ")),
        };

        Some(Signal::new(ScoringMethod::Genre, score, confidence, label))
    }
}
