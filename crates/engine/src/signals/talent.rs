use super::{ScoringContext, Signal, SignalScorer, weighted_mean};
use crate::attributes::{AttributeKey, TalentRole, normalize_name, parse_talent_tag};
use crate::config::ScoringMethod;
use std::collections::HashSet;

const DIRECTOR_MULTIPLIER: f32 = 2.0;

/// Directors and actors the user has rated before.
///
/// Directors count double. The label names the first matching tag in the
/// item's own credit order.
pub struct TalentScorer;

impl SignalScorer for TalentScorer {
    fn method(&self) -> ScoringMethod {
        ScoringMethod::Talent
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Option<Signal> {
        let mut seen = HashSet::new();
        let mut pairs = Vec::new();
        let mut label = None;

        for tag in &ctx.item.talent {
            let Some((role, name)) = parse_talent_tag(tag) else {
                continue;
            };
            let key = AttributeKey::Talent(role, normalize_name(name));
            if !seen.insert(key.clone()) {
                continue;
            }
            let Some(stats) = ctx.stats(&key) else {
                continue;
            };

            let multiplier = match role {
                TalentRole::Director => DIRECTOR_MULTIPLIER,
                TalentRole::Actor => 1.0,
            };
            pairs.push((stats.mean, stats.weight * multiplier));

            if label.is_none() {
                label = Some(match role {
                    TalentRole::Director => format!("Director: {name}"),
                    TalentRole::Actor => format!("Stars {name}"),
                });
            }
        }

        let matched = pairs.len();
        let score = weighted_mean(pairs)?;
        let confidence = (matched as f32 / 3.0).min(1.0);
        Some(Signal::new(
            ScoringMethod::Talent,
            score,
            confidence,
            label.unwrap_or_default(),
        ))
    }
}
