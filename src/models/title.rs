use serde::{Deserialize, Serialize};
use std::fmt::Display;

const NOT_AVAILABLE: &str = "Not available";

/// Type of content, as understood by the metadata provider's `type` parameter
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Movie,
    Series,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::Series => "series",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            ContentType::Movie => "movies",
            ContentType::Series => "series",
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A search hit: enough to identify a title, nothing more
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub year: String,
    /// IMDb id (e.g., "tt1375666"), shared by the metadata and poster providers
    pub external_id: String,
}

/// IMDb rating as reported by the provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Rating {
    Score(f32),
    Unknown,
}

impl Rating {
    /// Parses provider text; "N/A" and anything non-numeric become `Unknown`
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f32>() {
            Ok(score) if score.is_finite() => Rating::Score(score),
            _ => Rating::Unknown,
        }
    }

    /// Numeric value used for bucketing; unknown ratings count as zero
    pub fn value(&self) -> f32 {
        match self {
            Rating::Score(score) => *score,
            Rating::Unknown => 0.0,
        }
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rating::Score(score) => write!(f, "{:.1}", score),
            Rating::Unknown => f.write_str("N/A"),
        }
    }
}

/// Full metadata for one title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Details {
    pub title: String,
    pub year: String,
    pub plot: String,
    /// Poster reference from the metadata provider (may be a URL, "N/A", or empty)
    pub poster: String,
    pub rating: Rating,
    pub cast: String,
    pub director: String,
    pub genre: String,
    pub language: String,
    pub country: String,
    pub awards: String,
    pub external_id: String,
}

impl Details {
    /// Placeholder returned when details cannot be loaded
    pub fn unavailable(external_id: &str) -> Self {
        Self {
            title: "Error loading details".to_string(),
            year: "N/A".to_string(),
            plot: "Unable to load movie details".to_string(),
            poster: String::new(),
            rating: Rating::Unknown,
            cast: NOT_AVAILABLE.to_string(),
            director: NOT_AVAILABLE.to_string(),
            genre: NOT_AVAILABLE.to_string(),
            language: NOT_AVAILABLE.to_string(),
            country: NOT_AVAILABLE.to_string(),
            awards: NOT_AVAILABLE.to_string(),
            external_id: external_id.to_string(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.title == "Error loading details" && self.poster.is_empty()
    }

    pub fn imdb_url(&self) -> String {
        format!("https://www.imdb.com/title/{}/", self.external_id)
    }
}

/// Named rating buckets used to filter results
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RatingTier {
    #[serde(rename = "Top Rated", alias = "top_rated")]
    TopRated,
    #[serde(rename = "Good", alias = "good")]
    Good,
    #[serde(rename = "Average", alias = "average")]
    Average,
    #[serde(rename = "Low Rated", alias = "low_rated")]
    LowRated,
    #[default]
    #[serde(rename = "All", alias = "all")]
    All,
}

impl RatingTier {
    pub fn label(&self) -> &'static str {
        match self {
            RatingTier::TopRated => "Top Rated",
            RatingTier::Good => "Good",
            RatingTier::Average => "Average",
            RatingTier::LowRated => "Low Rated",
            RatingTier::All => "All",
        }
    }
}

impl Display for RatingTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A resolved suggestion, ready for display
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendedTitle {
    #[serde(flatten)]
    pub details: Details,
    pub poster_url: Option<String>,
    pub imdb_url: String,
}

impl RecommendedTitle {
    pub fn new(details: Details, poster_url: Option<String>) -> Self {
        let imdb_url = details.imdb_url();
        Self {
            details,
            poster_url,
            imdb_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_parse() {
        assert_eq!(Rating::parse("8.8"), Rating::Score(8.8));
        assert_eq!(Rating::parse("N/A"), Rating::Unknown);
        assert_eq!(Rating::parse(""), Rating::Unknown);
        assert_eq!(Rating::Unknown.value(), 0.0);
        assert_eq!(Rating::Score(8.8).to_string(), "8.8");
        assert_eq!(Rating::Unknown.to_string(), "N/A");
    }

    #[test]
    fn test_sentinel_details() {
        let details = Details::unavailable("tt0000001");
        assert_eq!(details.title, "Error loading details");
        assert_eq!(details.plot, "Unable to load movie details");
        assert_eq!(details.poster, "");
        assert_eq!(details.rating, Rating::Unknown);
        assert_eq!(details.cast, "Not available");
        assert!(details.is_unavailable());
    }

    #[test]
    fn test_rating_tier_labels_and_parsing() {
        let json = serde_json::to_string(&RatingTier::TopRated).unwrap();
        assert_eq!(json, "\"Top Rated\"");

        let tier: RatingTier = serde_json::from_str("\"low_rated\"").unwrap();
        assert_eq!(tier, RatingTier::LowRated);
    }

    #[test]
    fn test_recommended_title_links_imdb() {
        let mut details = Details::unavailable("tt1375666");
        details.title = "Inception".to_string();
        let recommended = RecommendedTitle::new(details, None);
        assert_eq!(recommended.imdb_url, "https://www.imdb.com/title/tt1375666/");
    }

    #[test]
    fn test_content_type_serialization() {
        assert_eq!(serde_json::to_string(&ContentType::Series).unwrap(), "\"series\"");
        assert_eq!(ContentType::Movie.as_str(), "movie");
    }
}
