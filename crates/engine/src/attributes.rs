//! Attribute extraction: turns a catalog item into canonical attribute keys.
//!
//! Keys partition a user's rating history into feature buckets (a genre,
//! a decade, a director, ...). The same extraction runs over history items
//! when aggregating and over the candidate when scoring, so a match is
//! plain key equality.

use catalog::CatalogItem;
use std::collections::BTreeSet;
use std::fmt;

/// Community votes required before the vote average is trusted
pub const MIN_COMMUNITY_VOTES: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TalentRole {
    Director,
    Actor,
}

impl TalentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TalentRole::Director => "director",
            TalentRole::Actor => "actor",
        }
    }
}

/// Age of a release relative to the reference year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgeBucket {
    New,
    Recent,
    Modern,
    Classic,
    Vintage,
}

impl AgeBucket {
    /// Bucket for an age in years; releases dated after the reference
    /// year count as new
    pub fn from_age(years: i32) -> Self {
        match years {
            y if y < 2 => AgeBucket::New,
            y if y < 5 => AgeBucket::Recent,
            y if y < 15 => AgeBucket::Modern,
            y if y < 30 => AgeBucket::Classic,
            _ => AgeBucket::Vintage,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeBucket::New => "new",
            AgeBucket::Recent => "recent",
            AgeBucket::Modern => "modern",
            AgeBucket::Classic => "classic",
            AgeBucket::Vintage => "vintage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuntimeBucket {
    Short,
    Standard,
    Long,
    Epic,
}

impl RuntimeBucket {
    pub fn from_minutes(minutes: u32) -> Self {
        match minutes {
            m if m < 90 => RuntimeBucket::Short,
            m if m < 120 => RuntimeBucket::Standard,
            m if m < 150 => RuntimeBucket::Long,
            _ => RuntimeBucket::Epic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeBucket::Short => "short",
            RuntimeBucket::Standard => "standard",
            RuntimeBucket::Long => "long",
            RuntimeBucket::Epic => "epic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PopularityTier {
    Blockbuster,
    Mainstream,
    Moderate,
    Indie,
}

impl PopularityTier {
    pub fn from_popularity(popularity: f32) -> Self {
        match popularity {
            p if p > 100.0 => PopularityTier::Blockbuster,
            p if p > 30.0 => PopularityTier::Mainstream,
            p if p > 10.0 => PopularityTier::Moderate,
            _ => PopularityTier::Indie,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PopularityTier::Blockbuster => "blockbuster",
            PopularityTier::Mainstream => "mainstream",
            PopularityTier::Moderate => "moderate",
            PopularityTier::Indie => "indie",
        }
    }
}

/// Tier of the community vote average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommunityTier {
    Excellent,
    Good,
    Average,
    Poor,
}

impl CommunityTier {
    pub fn from_average(average: f32) -> Self {
        match average {
            a if a >= 8.0 => CommunityTier::Excellent,
            a if a >= 7.0 => CommunityTier::Good,
            a if a >= 6.0 => CommunityTier::Average,
            _ => CommunityTier::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommunityTier::Excellent => "excellent",
            CommunityTier::Good => "good",
            CommunityTier::Average => "average",
            CommunityTier::Poor => "poor",
        }
    }
}

/// Canonical attribute of an item.
///
/// `Display` renders the familiar string form (`genre:28`,
/// `combo:28-35`, `director:christopher_nolan`, `tmdb:bias`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeKey {
    Genre(u32),
    /// Genre pair, lower id first
    GenreCombo(u32, u32),
    /// Role plus normalized name
    Talent(TalentRole, String),
    Decade(u16),
    Age(AgeBucket),
    Keyword(String),
    Runtime(RuntimeBucket),
    Language(String),
    Country(String),
    Popularity(PopularityTier),
    CommunityRating(CommunityTier),
    /// Present on every item with enough community votes; its samples
    /// measure how the user rates relative to the crowd
    CommunityBias,
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKey::Genre(id) => write!(f, "genre:{id}"),
            AttributeKey::GenreCombo(a, b) => write!(f, "combo:{a}-{b}"),
            AttributeKey::Talent(role, name) => write!(f, "{}:{name}", role.as_str()),
            AttributeKey::Decade(decade) => write!(f, "decade:{decade}"),
            AttributeKey::Age(bucket) => write!(f, "age:{}", bucket.as_str()),
            AttributeKey::Keyword(word) => write!(f, "keyword:{word}"),
            AttributeKey::Runtime(bucket) => write!(f, "runtime:{}", bucket.as_str()),
            AttributeKey::Language(code) => write!(f, "lang:{code}"),
            AttributeKey::Country(code) => write!(f, "country:{code}"),
            AttributeKey::Popularity(tier) => write!(f, "popularity:{}", tier.as_str()),
            AttributeKey::CommunityRating(tier) => write!(f, "tmdb:{}", tier.as_str()),
            AttributeKey::CommunityBias => f.write_str("tmdb:bias"),
        }
    }
}

/// Extract every attribute key the item supports, sorted and deduplicated.
///
/// Fields that are missing simply contribute no keys.
pub fn extract_attributes(item: &CatalogItem, reference_year: u16) -> Vec<AttributeKey> {
    let mut keys = Vec::new();

    // Genres as a sorted set so combos are stable
    let genres: BTreeSet<u32> = item.genre_ids.iter().copied().collect();
    let genres: Vec<u32> = genres.into_iter().collect();
    for (i, &a) in genres.iter().enumerate() {
        keys.push(AttributeKey::Genre(a));
        for &b in &genres[i + 1..] {
            keys.push(AttributeKey::GenreCombo(a, b));
        }
    }

    for tag in &item.talent {
        if let Some((role, name)) = parse_talent_tag(tag) {
            keys.push(AttributeKey::Talent(role, normalize_name(name)));
        }
    }

    if let Some(year) = item.release_year {
        keys.push(AttributeKey::Decade(decade_of(year)));
        let age = reference_year as i32 - year as i32;
        keys.push(AttributeKey::Age(AgeBucket::from_age(age)));
    }

    for keyword in &item.keywords {
        let keyword = keyword.trim().to_lowercase();
        if !keyword.is_empty() {
            keys.push(AttributeKey::Keyword(keyword));
        }
    }

    if let Some(minutes) = item.runtime_minutes {
        keys.push(AttributeKey::Runtime(RuntimeBucket::from_minutes(minutes)));
    }

    if let Some(code) = item.original_language.as_deref() {
        let code = code.trim();
        if !code.is_empty() {
            keys.push(AttributeKey::Language(code.to_ascii_lowercase()));
        }
    }
    for code in &item.production_countries {
        let code = code.trim();
        if !code.is_empty() {
            keys.push(AttributeKey::Country(code.to_ascii_uppercase()));
        }
    }

    if let Some(popularity) = item.popularity.filter(|p| p.is_finite()) {
        keys.push(AttributeKey::Popularity(PopularityTier::from_popularity(
            popularity,
        )));
    }

    if let Some(average) = trusted_vote_average(item) {
        keys.push(AttributeKey::CommunityRating(CommunityTier::from_average(
            average,
        )));
        keys.push(AttributeKey::CommunityBias);
    }

    keys.sort();
    keys.dedup();
    keys
}

/// Vote average, only when backed by more than `MIN_COMMUNITY_VOTES` votes
pub fn trusted_vote_average(item: &CatalogItem) -> Option<f32> {
    match (item.vote_average, item.vote_count) {
        (Some(average), Some(count)) if count > MIN_COMMUNITY_VOTES && average.is_finite() => {
            Some(average)
        }
        _ => None,
    }
}

pub fn decade_of(year: u16) -> u16 {
    year - year % 10
}

/// Split a `director:<name>` / `actor:<name>` tag. Other roles are ignored.
pub fn parse_talent_tag(tag: &str) -> Option<(TalentRole, &str)> {
    let (role, name) = tag.split_once(':')?;
    let role = match role.trim().to_ascii_lowercase().as_str() {
        "director" => TalentRole::Director,
        "actor" => TalentRole::Actor,
        _ => return None,
    };
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((role, name))
}

/// Lower-case, punctuation stripped, words joined with underscores
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::MediaType;

    fn rich_item() -> CatalogItem {
        CatalogItem::new(1, MediaType::Movie, "Inception")
            .with_genres([878, 28, 12])
            .with_talent(["director:Christopher Nolan", "actor:Leonardo DiCaprio"])
            .with_release_year(2010)
            .with_runtime(148)
            .with_keywords(["Heist", "dream"])
            .with_language("EN")
            .with_countries(["us", "GB"])
            .with_popularity(85.0)
            .with_votes(8.4, 35_000)
    }

    #[test]
    fn test_extracts_all_families() {
        let keys = extract_attributes(&rich_item(), 2025);
        let rendered: Vec<String> = keys.iter().map(|k| k.to_string()).collect();

        for expected in [
            "genre:12",
            "genre:28",
            "genre:878",
            "combo:12-28",
            "combo:12-878",
            "combo:28-878",
            "director:christopher_nolan",
            "actor:leonardo_dicaprio",
            "decade:2010",
            "age:classic",
            "keyword:heist",
            "keyword:dream",
            "runtime:long",
            "lang:en",
            "country:US",
            "country:GB",
            "popularity:mainstream",
            "tmdb:excellent",
            "tmdb:bias",
        ] {
            assert!(rendered.contains(&expected.to_string()), "missing {expected}");
        }
        assert_eq!(keys.len(), 19);
    }

    #[test]
    fn test_empty_item_has_no_keys() {
        let item = CatalogItem::new(2, MediaType::Book, "Untitled");
        assert!(extract_attributes(&item, 2025).is_empty());
    }

    #[test]
    fn test_combo_pairs_are_sorted_and_deduplicated() {
        let item = CatalogItem::new(3, MediaType::Movie, "x").with_genres([35, 28, 35]);
        let keys = extract_attributes(&item, 2025);
        assert_eq!(
            keys,
            vec![
                AttributeKey::Genre(28),
                AttributeKey::Genre(35),
                AttributeKey::GenreCombo(28, 35),
            ]
        );
    }

    #[test]
    fn test_community_keys_need_enough_votes() {
        let few = CatalogItem::new(4, MediaType::Movie, "x").with_votes(9.0, 50);
        assert!(extract_attributes(&few, 2025).is_empty());

        let enough = CatalogItem::new(5, MediaType::Movie, "x").with_votes(5.5, 51);
        let keys = extract_attributes(&enough, 2025);
        assert!(keys.contains(&AttributeKey::CommunityRating(CommunityTier::Poor)));
        assert!(keys.contains(&AttributeKey::CommunityBias));
    }

    #[test]
    fn test_age_buckets_follow_reference_year() {
        assert_eq!(AgeBucket::from_age(-1), AgeBucket::New);
        assert_eq!(AgeBucket::from_age(1), AgeBucket::New);
        assert_eq!(AgeBucket::from_age(2), AgeBucket::Recent);
        assert_eq!(AgeBucket::from_age(14), AgeBucket::Modern);
        assert_eq!(AgeBucket::from_age(29), AgeBucket::Classic);
        assert_eq!(AgeBucket::from_age(30), AgeBucket::Vintage);

        let item = CatalogItem::new(6, MediaType::Movie, "x").with_release_year(2020);
        assert!(extract_attributes(&item, 2021).contains(&AttributeKey::Age(AgeBucket::New)));
        assert!(extract_attributes(&item, 2040).contains(&AttributeKey::Age(AgeBucket::Classic)));
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(RuntimeBucket::from_minutes(89), RuntimeBucket::Short);
        assert_eq!(RuntimeBucket::from_minutes(90), RuntimeBucket::Standard);
        assert_eq!(RuntimeBucket::from_minutes(149), RuntimeBucket::Long);
        assert_eq!(RuntimeBucket::from_minutes(150), RuntimeBucket::Epic);

        assert_eq!(PopularityTier::from_popularity(100.0), PopularityTier::Mainstream);
        assert_eq!(PopularityTier::from_popularity(100.5), PopularityTier::Blockbuster);
        assert_eq!(PopularityTier::from_popularity(10.0), PopularityTier::Indie);

        assert_eq!(CommunityTier::from_average(8.0), CommunityTier::Excellent);
        assert_eq!(CommunityTier::from_average(6.99), CommunityTier::Average);
    }

    #[test]
    fn test_talent_parsing_and_normalization() {
        assert_eq!(
            parse_talent_tag("director: Agnès Varda"),
            Some((TalentRole::Director, "Agnès Varda"))
        );
        assert_eq!(parse_talent_tag("writer:Someone"), None);
        assert_eq!(parse_talent_tag("actor:"), None);
        assert_eq!(normalize_name("Robert  Downey Jr."), "robert_downey_jr");
        assert_eq!(normalize_name("Lupita Nyong'o"), "lupita_nyongo");
    }
}
