//! Human-readable names for genre ids and language/country codes.
//!
//! Used when turning attribute matches into reasons ("Loves Action &
//! Comedy", "French cinema"). Unknown ids fall back to a generic label.

/// TMDB genre id to display name (movie and TV genre lists)
pub fn genre_name(id: u32) -> Option<&'static str> {
    let name = match id {
        28 => "Action",
        12 => "Adventure",
        16 => "Animation",
        35 => "Comedy",
        80 => "Crime",
        99 => "Documentary",
        18 => "Drama",
        10751 => "Family",
        14 => "Fantasy",
        36 => "History",
        27 => "Horror",
        10402 => "Music",
        9648 => "Mystery",
        10749 => "Romance",
        878 => "Science Fiction",
        10770 => "TV Movie",
        53 => "Thriller",
        10752 => "War",
        37 => "Western",
        10759 => "Action & Adventure",
        10762 => "Kids",
        10763 => "News",
        10764 => "Reality",
        10765 => "Sci-Fi & Fantasy",
        10766 => "Soap",
        10767 => "Talk",
        10768 => "War & Politics",
        _ => return None,
    };
    Some(name)
}

/// Genre display name, or "Genre <id>" for unknown ids
pub fn genre_label(id: u32) -> String {
    genre_name(id)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Genre {id}"))
}

/// ISO 639-1 language code to display name
pub fn language_name(code: &str) -> String {
    let name = match code.to_ascii_lowercase().as_str() {
        "en" => "English",
        "fr" => "French",
        "es" => "Spanish",
        "de" => "German",
        "it" => "Italian",
        "ja" => "Japanese",
        "ko" => "Korean",
        "zh" | "cn" => "Chinese",
        "hi" => "Hindi",
        "pt" => "Portuguese",
        "ru" => "Russian",
        "sv" => "Swedish",
        "da" => "Danish",
        "no" => "Norwegian",
        "nl" => "Dutch",
        "pl" => "Polish",
        "tr" => "Turkish",
        "fa" => "Persian",
        "th" => "Thai",
        _ => return code.to_ascii_uppercase(),
    };
    name.to_string()
}

/// ISO 3166-1 country code to display name
pub fn country_name(code: &str) -> String {
    let name = match code.to_ascii_uppercase().as_str() {
        "US" => "United States",
        "GB" => "United Kingdom",
        "FR" => "France",
        "DE" => "Germany",
        "IT" => "Italy",
        "ES" => "Spain",
        "JP" => "Japan",
        "KR" => "South Korea",
        "CN" => "China",
        "IN" => "India",
        "CA" => "Canada",
        "AU" => "Australia",
        "NZ" => "New Zealand",
        "SE" => "Sweden",
        "DK" => "Denmark",
        "NO" => "Norway",
        "MX" => "Mexico",
        "BR" => "Brazil",
        "IE" => "Ireland",
        _ => return code.to_ascii_uppercase(),
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_genres() {
        assert_eq!(genre_name(28), Some("Action"));
        assert_eq!(genre_name(10765), Some("Sci-Fi & Fantasy"));
        assert_eq!(genre_name(1), None);
        assert_eq!(genre_label(1), "Genre 1");
    }

    #[test]
    fn test_code_fallbacks() {
        assert_eq!(language_name("fr"), "French");
        assert_eq!(language_name("xx"), "XX");
        assert_eq!(country_name("kr"), "South Korea");
        assert_eq!(country_name("zz"), "ZZ");
    }
}
