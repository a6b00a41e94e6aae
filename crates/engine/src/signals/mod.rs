//! Signal scorers and the set that runs them.
//!
//! Each scorer looks at one family of attribute matches between the
//! candidate and the user's taste profile and produces an optional
//! `(score, confidence, label)`. Scorers are independent; the combiner
//! decides how much each one counts.

pub mod baseline;
pub mod community;
pub mod critic;
pub mod era;
pub mod genre;
pub mod keyword;
pub mod origin;
pub mod popularity;
pub mod runtime;
pub mod talent;

pub use baseline::PersonalBaselineScorer;
pub use community::CommunityRatingScorer;
pub use critic::{CriticConsensusScorer, NEUTRAL_CRITIC_SCORE, critic_consensus};
pub use era::EraScorer;
pub use genre::GenreScorer;
pub use keyword::KeywordScorer;
pub use origin::OriginScorer;
pub use popularity::PopularityScorer;
pub use runtime::RuntimeScorer;
pub use talent::TalentScorer;

use crate::attributes::{AttributeKey, extract_attributes};
use crate::config::{EngineConfig, ScoringMethod};
use crate::profile::{SampleStats, TasteProfile};
use catalog::CatalogItem;
use tracing::trace;

/// Scores at or above this read as "likes" in reason labels
pub(crate) const LIKE_THRESHOLD: f32 = 5.0;

/// Output of one scorer for one candidate
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub method: ScoringMethod,
    /// Predicted rating on the 0-10 scale (unclamped)
    pub score: f32,
    /// 0.0-1.0, how much evidence backs the score
    pub confidence: f32,
    /// Human-readable reason
    pub label: String,
}

impl Signal {
    pub fn new(method: ScoringMethod, score: f32, confidence: f32, label: impl Into<String>) -> Self {
        Self {
            method,
            score,
            confidence,
            label: label.into(),
        }
    }
}

/// A candidate item viewed against one user's taste profile.
///
/// The candidate's attribute keys are extracted once and shared by all
/// scorers.
pub struct ScoringContext<'a> {
    pub item: &'a CatalogItem,
    pub profile: &'a TasteProfile,
    pub config: &'a EngineConfig,
    pub keys: Vec<AttributeKey>,
}

impl<'a> ScoringContext<'a> {
    pub fn new(item: &'a CatalogItem, profile: &'a TasteProfile, config: &'a EngineConfig) -> Self {
        Self {
            item,
            profile,
            config,
            keys: extract_attributes(item, config.reference_year),
        }
    }

    /// Samples under `key`, weighted for the candidate's media type
    pub fn stats(&self, key: &AttributeKey) -> Option<SampleStats> {
        let samples = self.profile.attributes.get(key)?;
        SampleStats::from_samples(samples, self.item.media_type, self.config.cross_media_weight)
    }

    /// Candidate keys accepted by `filter` that the user has history for
    pub fn matched<F>(&self, filter: F) -> Vec<(&AttributeKey, SampleStats)>
    where
        F: Fn(&AttributeKey) -> bool,
    {
        self.keys
            .iter()
            .filter(|key| filter(key))
            .filter_map(|key| self.stats(key).map(|stats| (key, stats)))
            .collect()
    }
}

/// Core trait for signal scorers.
///
/// `Send + Sync` so one scorer set can serve parallel batch scoring.
pub trait SignalScorer: Send + Sync {
    fn method(&self) -> ScoringMethod;

    /// Score the candidate, or `None` when there is nothing to go on
    fn score(&self, ctx: &ScoringContext<'_>) -> Option<Signal>;
}

/// Ordered collection of scorers.
///
/// ```ignore
/// let scorers = ScorerSet::new()
///     .add_scorer(GenreScorer)
///     .add_scorer(TalentScorer);
/// let signals = scorers.collect(&ctx);
/// ```
pub struct ScorerSet {
    scorers: Vec<Box<dyn SignalScorer>>,
}

impl ScorerSet {
    /// Empty set; see `Default` for the full lineup
    pub fn new() -> Self {
        Self {
            scorers: Vec::new(),
        }
    }

    pub fn add_scorer(mut self, scorer: impl SignalScorer + 'static) -> Self {
        self.scorers.push(Box::new(scorer));
        self
    }

    pub fn len(&self) -> usize {
        self.scorers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }

    pub fn methods(&self) -> Vec<ScoringMethod> {
        self.scorers.iter().map(|s| s.method()).collect()
    }

    /// Run every scorer, keeping the ones that produced a signal
    pub fn collect(&self, ctx: &ScoringContext<'_>) -> Vec<Signal> {
        self.scorers
            .iter()
            .filter_map(|scorer| {
                let signal = scorer.score(ctx);
                trace!(
                    "Scorer {} on item {}: {:?}",
                    scorer.method(),
                    ctx.item.id,
                    signal.as_ref().map(|s| (s.score, s.confidence))
                );
                signal
            })
            .collect()
    }
}

impl Default for ScorerSet {
    fn default() -> Self {
        Self::new()
            .add_scorer(GenreScorer)
            .add_scorer(TalentScorer)
            .add_scorer(KeywordScorer)
            .add_scorer(OriginScorer)
            .add_scorer(EraScorer)
            .add_scorer(RuntimeScorer)
            .add_scorer(PopularityScorer)
            .add_scorer(CommunityRatingScorer)
            .add_scorer(PersonalBaselineScorer)
            .add_scorer(CriticConsensusScorer)
    }
}

/// Weighted mean of `(score, weight)` pairs; `None` if no weight
pub(crate) fn weighted_mean(pairs: impl IntoIterator<Item = (f32, f32)>) -> Option<f32> {
    let (sum, total) = pairs
        .into_iter()
        .fold((0.0f32, 0.0f32), |(sum, total), (score, weight)| {
            (sum + score * weight, total + weight)
        });
    (total > 0.0).then(|| sum / total)
}
