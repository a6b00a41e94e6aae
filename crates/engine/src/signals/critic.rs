use super::{ScoringContext, Signal, SignalScorer};
use crate::config::ScoringMethod;
use catalog::CatalogItem;

/// Critic score assumed when no provider reported one
pub const NEUTRAL_CRITIC_SCORE: f32 = 6.0;

/// Mean of the available critic scores on the 0-10 scale.
///
/// IMDb is used as-is, Metacritic and Rotten Tomatoes are divided by 10.
/// Missing, "N/A" and unparsable values are ignored; `None` when nothing
/// usable is left.
pub fn critic_consensus(item: &CatalogItem) -> Option<f32> {
    let scores: Vec<f32> = [
        item.imdb_rating
            .as_deref()
            .and_then(|raw| parse_score(raw, "/10"))
            .filter(|v| (0.0..=10.0).contains(v)),
        item.metacritic
            .as_deref()
            .and_then(|raw| parse_score(raw, "/100"))
            .filter(|v| (0.0..=100.0).contains(v))
            .map(|v| v / 10.0),
        item.rotten_tomatoes
            .as_deref()
            .and_then(|raw| parse_score(raw, "%"))
            .filter(|v| (0.0..=100.0).contains(v))
            .map(|v| v / 10.0),
    ]
    .into_iter()
    .flatten()
    .collect();

    if scores.is_empty() {
        return None;
    }
    Some(scores.iter().sum::<f32>() / scores.len() as f32)
}

fn parse_score(raw: &str, suffix: &str) -> Option<f32> {
    let raw = raw.trim();
    let raw = raw.strip_suffix(suffix).unwrap_or(raw).trim();
    if raw.eq_ignore_ascii_case("n/a") {
        return None;
    }
    raw.parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Low-weight anchor on what critics think.
///
/// Only speaks up when the consensus differs from the neutral default, so
/// an item without critic data adds nothing.
pub struct CriticConsensusScorer;

impl SignalScorer for CriticConsensusScorer {
    fn method(&self) -> ScoringMethod {
        ScoringMethod::CriticConsensus
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Option<Signal> {
        let consensus = critic_consensus(ctx.item).unwrap_or(NEUTRAL_CRITIC_SCORE);
        if consensus == NEUTRAL_CRITIC_SCORE {
            return None;
        }
        Some(Signal::new(
            ScoringMethod::CriticConsensus,
            consensus,
            1.0,
            format!("Critics rate it {consensus:.1}/10"),
        ))
    }
}
