use serde::Deserialize;

pub mod chat;
pub mod request;
pub mod title;

pub use chat::{ChatTurn, Role};
pub use request::{Industry, SuggestionRequest, SuggestionType, YearRange};
pub use title::{Candidate, ContentType, Details, Rating, RatingTier, RecommendedTitle};

// ============================================================================
// OMDb API Types
// ============================================================================

/// Response from the `s=` search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Search", default)]
    pub search: Vec<OmdbSearchHit>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl OmdbSearchResponse {
    pub fn is_match(&self) -> bool {
        self.response == "True"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchHit {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
}

impl From<OmdbSearchHit> for Candidate {
    fn from(hit: OmdbSearchHit) -> Self {
        Candidate {
            title: hit.title,
            year: hit.year,
            external_id: hit.imdb_id,
        }
    }
}

/// Response from the `t=` and `i=` lookup endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbTitle {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: Option<String>,
    #[serde(default)]
    pub actors: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub awards: Option<String>,
    #[serde(rename = "imdbID", default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl OmdbTitle {
    /// The provider answers "False" when nothing matched
    pub fn is_match(&self) -> bool {
        self.response.as_deref() != Some("False")
    }

    pub fn into_details(self, requested_id: &str) -> Details {
        let or_na = |field: Option<String>| field.unwrap_or_else(|| "Not available".to_string());
        Details {
            title: or_na(self.title),
            year: self.year.unwrap_or_else(|| "N/A".to_string()),
            plot: or_na(self.plot),
            poster: self.poster.unwrap_or_default(),
            rating: self
                .imdb_rating
                .as_deref()
                .map(Rating::parse)
                .unwrap_or(Rating::Unknown),
            cast: or_na(self.actors),
            director: or_na(self.director),
            genre: or_na(self.genre),
            language: or_na(self.language),
            country: or_na(self.country),
            awards: or_na(self.awards),
            external_id: self.imdb_id.unwrap_or_else(|| requested_id.to_string()),
        }
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Response from `/find/{external_id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbFindResponse {
    #[serde(default)]
    pub movie_results: Vec<TmdbFindResult>,
    #[serde(default)]
    pub tv_results: Vec<TmdbFindResult>,
}

impl TmdbFindResponse {
    /// First movie match, else first series match
    pub fn best_match(&self) -> Option<&TmdbFindResult> {
        self.movie_results.first().or_else(|| self.tv_results.first())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbFindResult {
    #[serde(default)]
    pub poster_path: Option<String>,
}
