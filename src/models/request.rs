use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::{ContentType, RatingTier};
use crate::error::{AppError, AppResult};

/// Earliest release year the search form offers
pub const EARLIEST_YEAR: i32 = 1950;
pub const MAX_SUGGESTIONS: u32 = 10;

/// Flavour of suggestions requested from the model
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SuggestionType {
    #[default]
    #[serde(rename = "Any", alias = "any")]
    Any,
    #[serde(rename = "Random", alias = "random")]
    Random,
    #[serde(rename = "Top Rated", alias = "top_rated")]
    TopRated,
    #[serde(rename = "Good", alias = "good")]
    Good,
    #[serde(rename = "Average", alias = "average")]
    Average,
    #[serde(rename = "Low Rated", alias = "low_rated")]
    LowRated,
}

impl Display for SuggestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SuggestionType::Any => "Any",
            SuggestionType::Random => "Random",
            SuggestionType::TopRated => "Top Rated",
            SuggestionType::Good => "Good",
            SuggestionType::Average => "Average",
            SuggestionType::LowRated => "Low Rated",
        };
        f.write_str(label)
    }
}

/// Film industry the suggestions should come from
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Industry {
    #[default]
    #[serde(alias = "hollywood")]
    Hollywood,
    #[serde(alias = "bollywood")]
    Bollywood,
    #[serde(alias = "tollywood")]
    Tollywood,
    #[serde(alias = "korean")]
    Korean,
    #[serde(alias = "international")]
    International,
    #[serde(alias = "gujarati")]
    Gujarati,
}

impl Display for Industry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Industry::Hollywood => "Hollywood",
            Industry::Bollywood => "Bollywood",
            Industry::Tollywood => "Tollywood",
            Industry::Korean => "Korean",
            Industry::International => "International",
            Industry::Gujarati => "Gujarati",
        };
        f.write_str(label)
    }
}

/// Inclusive release-year window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            start: 2000,
            end: current_year(),
        }
    }
}

impl Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Facets chosen on the search form; consumed once per search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionRequest {
    #[serde(default)]
    pub content_type: ContentType,
    pub genre: String,
    #[serde(default)]
    pub suggestion_type: SuggestionType,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub rating_tier: RatingTier,
    #[serde(default)]
    pub year_range: YearRange,
    #[serde(default)]
    pub industry: Industry,
}

fn default_count() -> u32 {
    5
}

impl SuggestionRequest {
    pub fn new(genre: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::default(),
            genre: genre.into(),
            suggestion_type: SuggestionType::default(),
            count: default_count(),
            rating_tier: RatingTier::default(),
            year_range: YearRange::default(),
            industry: Industry::default(),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.genre.trim().is_empty() {
            return Err(AppError::InvalidInput("Please enter a genre.".to_string()));
        }
        if !(1..=MAX_SUGGESTIONS).contains(&self.count) {
            return Err(AppError::InvalidInput(format!(
                "Number of suggestions must be between 1 and {}",
                MAX_SUGGESTIONS
            )));
        }
        let YearRange { start, end } = self.year_range;
        if start > end || start < EARLIEST_YEAR || end > current_year() {
            return Err(AppError::InvalidInput(format!(
                "Year range must lie within {}-{} with start <= end",
                EARLIEST_YEAR,
                current_year()
            )));
        }
        Ok(())
    }
}
