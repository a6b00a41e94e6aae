//! Combiner: merges signal outputs into one prediction.

use crate::config::ScorerWeights;
use crate::signals::{NEUTRAL_CRITIC_SCORE, Signal};
use serde::Serialize;
use std::fmt::Write;

// =============================================================================
// Constants
// =============================================================================

pub const MIN_SCORE: f32 = 1.0;
pub const MAX_SCORE: f32 = 10.0;
pub const MAX_CONFIDENCE: f32 = 0.9;

/// Confidence when the user has no history at all
pub const NO_HISTORY_CONFIDENCE: f32 = 0.2;
/// Confidence when the user has history, but none for this media type
pub const CROSS_MEDIA_CONFIDENCE: f32 = 0.25;
pub const CRITIC_FALLBACK_REASON: &str = "Based on critic consensus";

/// Data points that saturate confidence (before the 0.9 cap)
const CONFIDENCE_DATA_POINTS: f32 = 8.0;
const MAX_REASONS: usize = 3;

/// The two heaviest signals get this extra factor in the blend
const POSITION_BOOST: f32 = 1.5;
const POSITION_BOOSTED: usize = 2;

/// A strongest signal at least this heavy pulls the blend halfway to it
const AMPLIFY_MIN_WEIGHT: f32 = 3.0;
const AMPLIFY_SHIFT: f32 = 0.5;

/// Signal scores further apart than this count as a disagreement
const DISAGREEMENT_SPREAD: f32 = 2.0;
const DISAGREEMENT_KEEP: f32 = 0.6;
const DISAGREEMENT_PULL: f32 = 0.4;

// =============================================================================
// Prediction Result
// =============================================================================

/// One predicted rating
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// 1.0-10.0
    pub score: f32,
    /// 0.0-0.9
    pub confidence: f32,
    /// Up to three reasons, most important first
    pub reasons: Vec<String>,
    /// Per-signal breakdown, present when tracing is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl PredictionResult {
    /// True for the critic-only fallbacks: show "not enough data yet"
    pub fn is_low_confidence(&self) -> bool {
        self.confidence <= CROSS_MEDIA_CONFIDENCE
    }
}

// =============================================================================
// Combiner
// =============================================================================

/// Weighted blend with position boost, amplification and disagreement
/// handling.
///
/// ## Algorithm
/// 1. weight = confidence x method multiplier; weightless signals drop out
/// 2. Sort by weight, boost the top two x1.5, take the weighted average
/// 3. Strongest weight >= 3.0: move 50% of the way to its score
/// 4. Strongest and weakest scores more than 2.0 apart:
///    `blended * 0.6 + strongest * 0.4`
/// 5. Clamp to 1.0-10.0
#[derive(Debug, Clone)]
pub struct Combiner {
    weights: ScorerWeights,
    trace: bool,
}

struct Weighted {
    signal: Signal,
    weight: f32,
}

impl Combiner {
    pub fn new(weights: ScorerWeights, trace: bool) -> Self {
        Self { weights, trace }
    }

    /// Blend `signals`; `None` when no signal carries any weight.
    ///
    /// `data_points` drives the confidence, see `confidence_for`.
    pub fn combine(&self, signals: Vec<Signal>, data_points: usize) -> Option<PredictionResult> {
        let mut weighted: Vec<Weighted> = signals
            .into_iter()
            .filter(|signal| signal.score.is_finite())
            .filter_map(|signal| {
                let weight = signal.confidence * self.weights.multiplier(signal.method);
                (weight.is_finite() && weight > 0.0).then_some(Weighted { signal, weight })
            })
            .collect();
        if weighted.is_empty() {
            return None;
        }

        // Stable: equal weights keep scorer order
        weighted.sort_by(|a, b| b.weight.total_cmp(&a.weight));

        let mut trace = self.trace.then(String::new);
        if let Some(out) = trace.as_mut() {
            for w in &weighted {
                let _ = writeln!(
                    out,
                    "{:<18} score={:.2} confidence={:.2} weight={:.2}  {}",
                    w.signal.method.name(),
                    w.signal.score,
                    w.signal.confidence,
                    w.weight,
                    w.signal.label
                );
            }
        }

        let (sum, total) = weighted.iter().enumerate().fold(
            (0.0f32, 0.0f32),
            |(sum, total), (position, w)| {
                let boosted = if position < POSITION_BOOSTED {
                    w.weight * POSITION_BOOST
                } else {
                    w.weight
                };
                (sum + w.signal.score * boosted, total + boosted)
            },
        );
        let mut blended = sum / total;
        if let Some(out) = trace.as_mut() {
            let _ = writeln!(out, "blended {blended:.2}");
        }

        let strongest = &weighted[0];
        let weakest = &weighted[weighted.len() - 1];

        if strongest.weight >= AMPLIFY_MIN_WEIGHT {
            let before = blended;
            blended += (strongest.signal.score - blended) * AMPLIFY_SHIFT;
            if let Some(out) = trace.as_mut() {
                let _ = writeln!(
                    out,
                    "amplified toward {}: {before:.2} -> {blended:.2}",
                    strongest.signal.method
                );
            }
        }

        let spread = (strongest.signal.score - weakest.signal.score).abs();
        if spread > DISAGREEMENT_SPREAD {
            let before = blended;
            blended = blended * DISAGREEMENT_KEEP + strongest.signal.score * DISAGREEMENT_PULL;
            if let Some(out) = trace.as_mut() {
                let _ = writeln!(
                    out,
                    "disagreement (spread {spread:.2}): {before:.2} -> {blended:.2}"
                );
            }
        }

        let score = clamp_score(blended);
        if let Some(out) = trace.as_mut() {
            if score != blended {
                let _ = writeln!(out, "clamped {blended:.2} -> {score:.1}");
            }
            let _ = writeln!(out, "data points {data_points}");
        }

        let reasons = weighted
            .iter()
            .map(|w| w.signal.label.as_str())
            .filter(|label| !label.is_empty())
            .take(MAX_REASONS)
            .map(str::to_string)
            .collect();

        Some(PredictionResult {
            score,
            confidence: confidence_for(data_points),
            reasons,
            trace,
        })
    }

    /// Critic-only result for users the engine cannot personalize for.
    ///
    /// `consensus` is the item's critic consensus, if it has one.
    pub fn fallback(
        &self,
        consensus: Option<f32>,
        confidence: f32,
        reasons: Vec<String>,
    ) -> PredictionResult {
        let score = clamp_score(consensus.unwrap_or(NEUTRAL_CRITIC_SCORE));
        let trace = self
            .trace
            .then(|| format!("critic fallback {score:.2} (confidence {confidence:.2})\n"));
        PredictionResult {
            score,
            confidence,
            reasons,
            trace,
        }
    }
}

/// `min(data_points / 8, 0.9)`
pub fn confidence_for(data_points: usize) -> f32 {
    (data_points as f32 / CONFIDENCE_DATA_POINTS).min(MAX_CONFIDENCE)
}

/// Clamp into 1.0-10.0; NaN maps to the neutral critic score
fn clamp_score(value: f32) -> f32 {
    if value.is_nan() {
        return NEUTRAL_CRITIC_SCORE;
    }
    value.clamp(MIN_SCORE, MAX_SCORE)
}
