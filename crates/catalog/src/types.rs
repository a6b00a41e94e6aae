//! Core domain types for catalog items and user history.
//!
//! This module defines the fundamental data structures shared by the
//! prediction engine and its collaborators:
//! - Type aliases for domain clarity (UserId, ItemId)
//! - Catalog items with optional metadata
//! - Explicit ratings and implicit "watched" signals
//! - The merged history handed to the engine for one identity

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a catalog item
pub type ItemId = u32;

/// Opaque user identifier
///
/// The engine never interprets it; two different identifiers are two
/// independent histories.
pub type UserId = String;

/// Reserved identity that owns records created before sign-in.
///
/// Its records are merged into every user's history until a migration
/// reassigns them (see `CatalogIndex::migrate_user`).
pub const ANONYMOUS_USER: &str = "unauthenticated";

// =============================================================================
// Catalog Types
// =============================================================================

/// Kind of catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Show,
    Book,
    Podcast,
}

impl MediaType {
    /// All media types, in declaration order
    pub const ALL: [MediaType; 4] = [
        MediaType::Movie,
        MediaType::Show,
        MediaType::Book,
        MediaType::Podcast,
    ];

    /// Plural, lower-case name used in user-facing prompts ("movies", "shows")
    pub fn plural(&self) -> &'static str {
        match self {
            MediaType::Movie => "movies",
            MediaType::Show => "shows",
            MediaType::Book => "books",
            MediaType::Podcast => "podcasts",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaType::Movie => "movie",
            MediaType::Show => "show",
            MediaType::Book => "book",
            MediaType::Podcast => "podcast",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaType::Movie),
            "show" | "shows" | "tv" => Ok(MediaType::Show),
            "book" | "books" => Ok(MediaType::Book),
            "podcast" | "podcasts" => Ok(MediaType::Podcast),
            other => Err(format!("unknown media type: {other}")),
        }
    }
}

/// A catalog item (movie, show, book or podcast) with its metadata.
///
/// Every field except `id` and `media_type` may be missing; the engine
/// simply skips the signals whose inputs are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub media_type: MediaType,
    pub title: String,

    /// Genre ids (TMDB numbering). Treated as a set.
    #[serde(default)]
    pub genre_ids: Vec<u32>,

    /// Cast/crew tags of the form `director:<name>` or `actor:<name>`
    #[serde(default)]
    pub talent: Vec<String>,

    #[serde(default)]
    pub release_year: Option<u16>,
    #[serde(default)]
    pub runtime_minutes: Option<u32>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub production_countries: Vec<String>,

    /// Popularity metric as reported by the catalog provider
    #[serde(default)]
    pub popularity: Option<f32>,
    /// Community vote average on a 0-10 scale
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub vote_count: Option<u32>,

    /// External critic scores exactly as the provider returns them:
    /// IMDb "8.1", Metacritic "74", Rotten Tomatoes "91%".
    #[serde(default)]
    pub imdb_rating: Option<String>,
    #[serde(default)]
    pub metacritic: Option<String>,
    #[serde(default)]
    pub rotten_tomatoes: Option<String>,
}

impl CatalogItem {
    /// Create an item with only the required fields set
    pub fn new(id: ItemId, media_type: MediaType, title: impl Into<String>) -> Self {
        Self {
            id,
            media_type,
            title: title.into(),
            genre_ids: Vec::new(),
            talent: Vec::new(),
            release_year: None,
            runtime_minutes: None,
            keywords: Vec::new(),
            original_language: None,
            production_countries: Vec::new(),
            popularity: None,
            vote_average: None,
            vote_count: None,
            imdb_rating: None,
            metacritic: None,
            rotten_tomatoes: None,
        }
    }

    pub fn with_genres(mut self, genre_ids: impl IntoIterator<Item = u32>) -> Self {
        self.genre_ids = genre_ids.into_iter().collect();
        self
    }

    pub fn with_talent<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.talent = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_release_year(mut self, year: u16) -> Self {
        self.release_year = Some(year);
        self
    }

    pub fn with_runtime(mut self, minutes: u32) -> Self {
        self.runtime_minutes = Some(minutes);
        self
    }

    pub fn with_keywords<S: Into<String>>(mut self, keywords: impl IntoIterator<Item = S>) -> Self {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        self.original_language = Some(code.into());
        self
    }

    pub fn with_countries<S: Into<String>>(mut self, codes: impl IntoIterator<Item = S>) -> Self {
        self.production_countries = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_popularity(mut self, popularity: f32) -> Self {
        self.popularity = Some(popularity);
        self
    }

    pub fn with_votes(mut self, average: f32, count: u32) -> Self {
        self.vote_average = Some(average);
        self.vote_count = Some(count);
        self
    }

    /// Set critic scores; pass `None` for any the provider did not report
    pub fn with_critics(
        mut self,
        imdb: Option<&str>,
        metacritic: Option<&str>,
        rotten_tomatoes: Option<&str>,
    ) -> Self {
        self.imdb_rating = imdb.map(str::to_string);
        self.metacritic = metacritic.map(str::to_string);
        self.rotten_tomatoes = rotten_tomatoes.map(str::to_string);
        self
    }
}

// =============================================================================
// History Types
// =============================================================================

/// A rating the user deliberately entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplicitRating {
    pub user_id: UserId,
    pub item_id: ItemId,
    /// Rating on the 0-100 display scale
    pub value: f32,
}

impl ExplicitRating {
    pub fn new(user_id: impl Into<UserId>, item_id: ItemId, value: f32) -> Self {
        Self {
            user_id: user_id.into(),
            item_id,
            value,
        }
    }

    /// Rating rescaled to 0-10
    pub fn normalized(&self) -> f32 {
        (self.value / 10.0).clamp(0.0, 10.0)
    }
}

/// "Watched but never rated" fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplicitSignal {
    pub user_id: UserId,
    pub item_id: ItemId,
    /// Unix timestamp of the watch/log event
    pub watched_at: i64,
}

impl ImplicitSignal {
    pub fn new(user_id: impl Into<UserId>, item_id: ItemId, watched_at: i64) -> Self {
        Self {
            user_id: user_id.into(),
            item_id,
            watched_at,
        }
    }
}

/// Everything one identity has recorded, already merged with the
/// anonymous identity's records.
///
/// Records belonging to the requested identity come first, so consumers
/// that deduplicate by item keep the user's own record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserHistory {
    pub ratings: Vec<ExplicitRating>,
    pub signals: Vec<ImplicitSignal>,
}

impl UserHistory {
    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty() && self.signals.is_empty()
    }
}

// =============================================================================
// CatalogIndex - In-Memory Catalog and History Store
// =============================================================================

/// In-memory catalog plus per-user history, indexed for the lookups the
/// engine performs: item by id, history by user, items by media type.
///
/// Every mutation of a user's records bumps that user's generation
/// counter so cached taste profiles can be invalidated.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    pub(crate) items: HashMap<ItemId, CatalogItem>,

    /// Explicit ratings per user, at most one per item
    pub(crate) user_ratings: HashMap<UserId, Vec<ExplicitRating>>,
    /// Implicit signals per user, at most one per item
    pub(crate) user_signals: HashMap<UserId, Vec<ImplicitSignal>>,

    /// Position of each user's record for an item in the lists above
    pub(crate) rating_positions: HashMap<UserId, HashMap<ItemId, usize>>,
    pub(crate) signal_positions: HashMap<UserId, HashMap<ItemId, usize>>,

    /// Items grouped by media type, sorted by id
    pub(crate) media_index: HashMap<MediaType, Vec<ItemId>>,

    pub(crate) generations: HashMap<UserId, u64>,
}

impl CatalogIndex {
    /// Creates a new, empty CatalogIndex
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_item(&self, id: ItemId) -> Option<&CatalogItem> {
        self.items.get(&id)
    }

    /// Explicit ratings owned by exactly this identity (not merged)
    pub fn get_user_ratings(&self, user_id: &str) -> &[ExplicitRating] {
        self.user_ratings
            .get(user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Implicit signals owned by exactly this identity (not merged)
    pub fn get_user_signals(&self, user_id: &str) -> &[ImplicitSignal] {
        self.user_signals
            .get(user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Items of one media type; empty until `build_secondary_indices` runs
    pub fn get_items_by_media(&self, media_type: MediaType) -> &[ItemId] {
        self.media_index
            .get(&media_type)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// All items, sorted by id
    pub fn items(&self) -> Vec<&CatalogItem> {
        let mut items: Vec<&CatalogItem> = self.items.values().collect();
        items.sort_by_key(|item| item.id);
        items
    }

    /// Every identity that owns at least one record, sorted
    pub fn user_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .user_ratings
            .keys()
            .chain(self.user_signals.keys())
            .map(String::as_str)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Change counter for records owned by exactly this identity
    pub fn own_generation(&self, user_id: &str) -> u64 {
        self.generations.get(user_id).copied().unwrap_or(0)
    }

    pub fn insert_item(&mut self, item: CatalogItem) {
        self.items.insert(item.id, item);
    }

    /// Insert or replace the user's rating for an item
    pub fn insert_rating(&mut self, rating: ExplicitRating) {
        let user_id = rating.user_id.clone();
        let ratings = self.user_ratings.entry(user_id.clone()).or_default();
        let positions = self.rating_positions.entry(user_id.clone()).or_default();
        match positions.get(&rating.item_id) {
            Some(&position) => ratings[position] = rating,
            None => {
                positions.insert(rating.item_id, ratings.len());
                ratings.push(rating);
            }
        }
        self.bump_generation(&user_id);
    }

    /// Remove the user's rating for an item; returns whether one existed
    pub fn remove_rating(&mut self, user_id: &str, item_id: ItemId) -> bool {
        let Some(positions) = self.rating_positions.get_mut(user_id) else {
            return false;
        };
        let Some(removed) = positions.remove(&item_id) else {
            return false;
        };
        for position in positions.values_mut() {
            if *position > removed {
                *position -= 1;
            }
        }
        if let Some(ratings) = self.user_ratings.get_mut(user_id) {
            ratings.remove(removed);
        }
        self.bump_generation(user_id);
        true
    }

    /// Record a watch event; a repeat watch of the same item only
    /// refreshes its timestamp
    pub fn insert_signal(&mut self, signal: ImplicitSignal) {
        let user_id = signal.user_id.clone();
        let signals = self.user_signals.entry(user_id.clone()).or_default();
        let positions = self.signal_positions.entry(user_id.clone()).or_default();
        match positions.get(&signal.item_id) {
            Some(&position) => {
                let existing = &mut signals[position];
                existing.watched_at = existing.watched_at.max(signal.watched_at);
            }
            None => {
                positions.insert(signal.item_id, signals.len());
                signals.push(signal);
            }
        }
        self.bump_generation(&user_id);
    }

    /// Reassign every record owned by `from` to `to`.
    ///
    /// Used when an anonymous user signs in. Records `to` already has for
    /// the same item win over the migrated ones. Returns the number of
    /// records that changed owner.
    pub fn migrate_user(&mut self, from: &str, to: &str) -> usize {
        if from == to {
            return 0;
        }
        let mut moved = 0;

        let incoming = self.user_ratings.remove(from).unwrap_or_default();
        self.rating_positions.remove(from);
        let target = self.user_ratings.entry(to.to_string()).or_default();
        let positions = self.rating_positions.entry(to.to_string()).or_default();
        for mut rating in incoming {
            if positions.contains_key(&rating.item_id) {
                continue;
            }
            rating.user_id = to.to_string();
            positions.insert(rating.item_id, target.len());
            target.push(rating);
            moved += 1;
        }

        let incoming = self.user_signals.remove(from).unwrap_or_default();
        self.signal_positions.remove(from);
        let target = self.user_signals.entry(to.to_string()).or_default();
        let positions = self.signal_positions.entry(to.to_string()).or_default();
        for mut signal in incoming {
            if positions.contains_key(&signal.item_id) {
                continue;
            }
            signal.user_id = to.to_string();
            positions.insert(signal.item_id, target.len());
            target.push(signal);
            moved += 1;
        }

        self.bump_generation(from);
        self.bump_generation(to);
        moved
    }

    /// Get counts for debugging/validation: (items, ratings, signals)
    pub fn counts(&self) -> (usize, usize, usize) {
        let ratings = self.user_ratings.values().map(|v| v.len()).sum();
        let signals = self.user_signals.values().map(|v| v.len()).sum();
        (self.items.len(), ratings, signals)
    }

    fn bump_generation(&mut self, user_id: &str) {
        *self.generations.entry(user_id.to_string()).or_insert(0) += 1;
    }
}
