//! Engine configuration and the scorer-weight table.
//!
//! All tunable numbers that are not part of a scorer's own formula live
//! here, so tuning or testing a weighting never means editing scoring code.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Year used for age buckets when the caller does not pick one
pub const DEFAULT_REFERENCE_YEAR: u16 = 2025;

/// Assumed 0-10 rating for an item the user watched but never rated
pub const DEFAULT_IMPLICIT_RATING: f32 = 6.5;

/// One signal scorer, used as the key into `ScorerWeights`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMethod {
    Genre,
    Talent,
    Keyword,
    Origin,
    Era,
    Runtime,
    Popularity,
    CommunityRating,
    PersonalBaseline,
    CriticConsensus,
}

impl ScoringMethod {
    pub const ALL: [ScoringMethod; 10] = [
        ScoringMethod::Genre,
        ScoringMethod::Talent,
        ScoringMethod::Keyword,
        ScoringMethod::Origin,
        ScoringMethod::Era,
        ScoringMethod::Runtime,
        ScoringMethod::Popularity,
        ScoringMethod::CommunityRating,
        ScoringMethod::PersonalBaseline,
        ScoringMethod::CriticConsensus,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScoringMethod::Genre => "genre",
            ScoringMethod::Talent => "talent",
            ScoringMethod::Keyword => "keyword",
            ScoringMethod::Origin => "origin",
            ScoringMethod::Era => "era",
            ScoringMethod::Runtime => "runtime",
            ScoringMethod::Popularity => "popularity",
            ScoringMethod::CommunityRating => "community_rating",
            ScoringMethod::PersonalBaseline => "personal_baseline",
            ScoringMethod::CriticConsensus => "critic_consensus",
        }
    }
}

impl fmt::Display for ScoringMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Method multipliers applied by the combiner.
///
/// A signal's blending weight is `confidence * multiplier`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerWeights {
    pub genre: f32,
    pub talent: f32,
    pub keyword: f32,
    pub origin: f32,
    pub era: f32,
    pub runtime: f32,
    pub popularity: f32,
    pub community_rating: f32,
    pub personal_baseline: f32,
    pub critic_consensus: f32,
}

impl Default for ScorerWeights {
    fn default() -> Self {
        Self {
            genre: 5.0,
            talent: 4.0,
            keyword: 3.5,
            origin: 2.0,
            era: 1.5,
            runtime: 1.5,
            popularity: 1.2,
            community_rating: 1.0,
            personal_baseline: 1.0,
            critic_consensus: 0.75,
        }
    }
}

impl ScorerWeights {
    pub fn multiplier(&self, method: ScoringMethod) -> f32 {
        match method {
            ScoringMethod::Genre => self.genre,
            ScoringMethod::Talent => self.talent,
            ScoringMethod::Keyword => self.keyword,
            ScoringMethod::Origin => self.origin,
            ScoringMethod::Era => self.era,
            ScoringMethod::Runtime => self.runtime,
            ScoringMethod::Popularity => self.popularity,
            ScoringMethod::CommunityRating => self.community_rating,
            ScoringMethod::PersonalBaseline => self.personal_baseline,
            ScoringMethod::CriticConsensus => self.critic_consensus,
        }
    }

    /// Override a single multiplier (builder pattern)
    pub fn with_multiplier(mut self, method: ScoringMethod, value: f32) -> Self {
        let slot = match method {
            ScoringMethod::Genre => &mut self.genre,
            ScoringMethod::Talent => &mut self.talent,
            ScoringMethod::Keyword => &mut self.keyword,
            ScoringMethod::Origin => &mut self.origin,
            ScoringMethod::Era => &mut self.era,
            ScoringMethod::Runtime => &mut self.runtime,
            ScoringMethod::Popularity => &mut self.popularity,
            ScoringMethod::CommunityRating => &mut self.community_rating,
            ScoringMethod::PersonalBaseline => &mut self.personal_baseline,
            ScoringMethod::CriticConsensus => &mut self.critic_consensus,
        };
        *slot = value;
        self
    }
}

/// Settings for a `PreferencePredictor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weights: ScorerWeights,

    /// "Current" year for the age buckets (new/recent/modern/...).
    /// Explicit so results do not drift with the wall clock.
    pub reference_year: u16,

    /// Rating assumed for watched-but-unrated items (0-10)
    pub implicit_rating: f32,

    /// Sample weight of an implicit signal relative to an explicit rating
    pub implicit_weight: f32,

    /// Sample weight of history from a different media type than the
    /// candidate's
    pub cross_media_weight: f32,

    /// Number of taste profiles kept between calls; 0 disables caching
    pub cache_capacity: usize,

    /// Attach a per-signal diagnostic trace to every prediction
    pub trace: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: ScorerWeights::default(),
            reference_year: DEFAULT_REFERENCE_YEAR,
            implicit_rating: DEFAULT_IMPLICIT_RATING,
            implicit_weight: 0.5,
            cross_media_weight: 0.6,
            cache_capacity: 256,
            trace: false,
        }
    }
}

impl EngineConfig {
    /// Default settings anchored to the given reference year
    pub fn new(reference_year: u16) -> Self {
        Self {
            reference_year,
            ..Self::default()
        }
    }

    pub fn with_weights(mut self, weights: ScorerWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_reference_year(mut self, year: u16) -> Self {
        self.reference_year = year;
        self
    }

    pub fn with_implicit_weight(mut self, weight: f32) -> Self {
        self.implicit_weight = weight;
        self
    }

    pub fn with_cross_media_weight(mut self, weight: f32) -> Self {
        self.cross_media_weight = weight;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_are_ordered_strongest_first() {
        let weights = ScorerWeights::default();
        assert!(weights.genre > weights.talent);
        assert!(weights.talent > weights.keyword);
        assert!(weights.keyword > weights.origin);
        assert!(weights.popularity > weights.community_rating);
        assert!((0.5..=1.0).contains(&weights.critic_consensus));
    }

    #[test]
    fn test_with_multiplier_overrides_one_method() {
        let weights = ScorerWeights::default().with_multiplier(ScoringMethod::Era, 9.0);
        assert_eq!(weights.multiplier(ScoringMethod::Era), 9.0);
        assert_eq!(weights.multiplier(ScoringMethod::Genre), 5.0);
    }

    #[test]
    fn test_partial_config_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "reference_year": 2030, "weights": { "genre": 6.0 } }"#)
                .unwrap();

        assert_eq!(config.reference_year, 2030);
        assert_eq!(config.weights.genre, 6.0);
        assert_eq!(config.weights.talent, 4.0);
        assert_eq!(config.implicit_rating, DEFAULT_IMPLICIT_RATING);
    }
}
