//! History aggregation: builds a user's taste profile.
//!
//! One pass over the user's explicit ratings and implicit signals turns
//! every history item into attribute keys and files the rating under each
//! key. The resulting `TasteProfile` is everything the signal scorers need,
//! so it can be built once and reused for any number of candidates.

use crate::attributes::{AttributeKey, extract_attributes};
use crate::config::EngineConfig;
use catalog::{CatalogAccessor, ItemId, MediaType, UserHistory};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// One rating filed under an attribute key
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Rating on the 0-10 scale
    pub value: f32,
    /// 1.0 for explicit ratings, `implicit_weight` for watch signals
    pub weight: f32,
    /// Media type of the rated item
    pub media_type: MediaType,
}

/// Weighted summary of the samples under one key, as seen from a
/// candidate of a given media type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
    pub mean: f32,
    /// Sum of effective sample weights
    pub weight: f32,
    pub variance: f32,
    /// Number of raw samples
    pub count: usize,
}

impl SampleStats {
    /// Summarize samples, down-weighting those from other media types.
    ///
    /// Returns `None` when nothing carries weight.
    pub fn from_samples(
        samples: &[Sample],
        target: MediaType,
        cross_media_weight: f32,
    ) -> Option<Self> {
        let effective = |s: &Sample| {
            if s.media_type == target {
                s.weight
            } else {
                s.weight * cross_media_weight
            }
        };

        let total: f32 = samples.iter().map(effective).sum();
        if samples.is_empty() || total <= 0.0 {
            return None;
        }

        let mean = samples.iter().map(|s| s.value * effective(s)).sum::<f32>() / total;
        let variance = samples
            .iter()
            .map(|s| effective(s) * (s.value - mean).powi(2))
            .sum::<f32>()
            / total;

        Some(Self {
            mean,
            weight: total,
            variance,
            count: samples.len(),
        })
    }
}

/// Attribute key to the ratings filed under it.
///
/// Keys only exist once they hold at least one sample.
#[derive(Debug, Clone, Default)]
pub struct AttributeScoreMap {
    entries: HashMap<AttributeKey, Vec<Sample>>,
}

impl AttributeScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: AttributeKey, sample: Sample) {
        self.entries.entry(key).or_default().push(sample);
    }

    pub fn get(&self, key: &AttributeKey) -> Option<&[Sample]> {
        self.entries.get(key).map(|v| v.as_slice())
    }

    pub fn contains(&self, key: &AttributeKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttributeKey, &[Sample])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

/// Everything the engine knows about one user's taste.
#[derive(Debug, Clone)]
pub struct TasteProfile {
    pub user_id: String,
    pub attributes: AttributeScoreMap,
    /// Explicit 0-10 ratings grouped by the rated item's media type
    explicit_ratings: HashMap<MediaType, Vec<f32>>,
    /// Implicit signals that contributed (items without an explicit rating)
    pub implicit_count: usize,
    /// History records whose item the catalog could not resolve
    pub skipped_records: usize,
}

impl TasteProfile {
    /// Profile with no history at all
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            attributes: AttributeScoreMap::new(),
            explicit_ratings: HashMap::new(),
            implicit_count: 0,
            skipped_records: 0,
        }
    }

    pub fn explicit_count(&self) -> usize {
        self.explicit_ratings.values().map(Vec::len).sum()
    }

    pub fn explicit_count_for(&self, media_type: MediaType) -> usize {
        self.ratings_for(media_type).len()
    }

    /// Explicit ratings of one media type, in history order
    pub fn ratings_for(&self, media_type: MediaType) -> &[f32] {
        self.explicit_ratings
            .get(&media_type)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// All explicit ratings, grouped by media type in a fixed order
    pub fn all_ratings(&self) -> Vec<f32> {
        MediaType::ALL
            .iter()
            .flat_map(|media| self.ratings_for(*media).iter().copied())
            .collect()
    }

    /// True if the user has rated or watched anything
    pub fn has_history(&self) -> bool {
        self.explicit_count() > 0 || self.implicit_count > 0
    }

    /// Attribute keys ordered by evidence (sample count), strongest first
    pub fn strongest_attributes(&self, limit: usize) -> Vec<(&AttributeKey, usize, f32)> {
        let mut keys: Vec<(&AttributeKey, usize, f32)> = self
            .attributes
            .iter()
            .map(|(key, samples)| {
                let mean = samples.iter().map(|s| s.value).sum::<f32>() / samples.len() as f32;
                (key, samples.len(), mean)
            })
            .collect();
        keys.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        keys.truncate(limit);
        keys
    }
}

/// Build a taste profile from a user's merged history.
///
/// ## Algorithm
/// 1. Every explicit rating: resolve the item, rescale to 0-10, file it
///    under each of the item's attribute keys (weight 1.0)
/// 2. Every implicit signal for an item without an explicit rating: same,
///    with the assumed implicit rating and weight
///
/// The first record per item wins, so the user's own rating shadows one
/// left by the anonymous identity. Unresolvable items are skipped.
#[instrument(skip(history, catalog, config))]
pub fn build_taste_profile(
    user_id: &str,
    history: &UserHistory,
    catalog: &dyn CatalogAccessor,
    config: &EngineConfig,
) -> TasteProfile {
    let mut profile = TasteProfile::empty(user_id);
    let mut rated: HashSet<ItemId> = HashSet::new();

    for rating in &history.ratings {
        if !rated.insert(rating.item_id) {
            continue;
        }
        let Some(item) = catalog.item(rating.item_id) else {
            debug!("Skipping rating for unknown item {}", rating.item_id);
            profile.skipped_records += 1;
            continue;
        };
        let value = rating.normalized();
        if !value.is_finite() {
            profile.skipped_records += 1;
            continue;
        }

        profile
            .explicit_ratings
            .entry(item.media_type)
            .or_default()
            .push(value);

        let sample = Sample {
            value,
            weight: 1.0,
            media_type: item.media_type,
        };
        for key in extract_attributes(item, config.reference_year) {
            profile.attributes.push(key, sample);
        }
    }

    let mut watched: HashSet<ItemId> = HashSet::new();
    for signal in &history.signals {
        if rated.contains(&signal.item_id) || !watched.insert(signal.item_id) {
            continue;
        }
        let Some(item) = catalog.item(signal.item_id) else {
            debug!("Skipping watch signal for unknown item {}", signal.item_id);
            profile.skipped_records += 1;
            continue;
        };

        profile.implicit_count += 1;
        let sample = Sample {
            value: config.implicit_rating,
            weight: config.implicit_weight,
            media_type: item.media_type,
        };
        for key in extract_attributes(item, config.reference_year) {
            profile.attributes.push(key, sample);
        }
    }

    debug!(
        "Built taste profile: {} explicit, {} implicit, {} attribute keys, {} skipped",
        profile.explicit_count(),
        profile.implicit_count,
        profile.attributes.len(),
        profile.skipped_records
    );
    profile
}
