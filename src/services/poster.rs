//! TMDB poster lookup by IMDb id
//!
//! Many titles have no TMDB record, so an absent poster is a normal answer.

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::TmdbFindResponse,
    notice::{Notices, Outcome},
    retry::RetryPolicy,
    services::providers::JsonFetcher,
};

pub struct PosterResolver {
    fetcher: Arc<dyn JsonFetcher>,
    api_url: String,
    api_key: String,
    image_base: String,
    retry: RetryPolicy,
}

impl PosterResolver {
    pub fn new(
        fetcher: Arc<dyn JsonFetcher>,
        api_url: String,
        api_key: String,
        image_base: String,
        max_attempts: u32,
    ) -> Self {
        Self {
            fetcher,
            api_url,
            api_key,
            image_base,
            retry: RetryPolicy::on_request_error(max_attempts),
        }
    }

    async fn find(&self, external_id: &str) -> AppResult<Option<String>> {
        let url = format!("{}/find/{}", self.api_url.trim_end_matches('/'), external_id);
        let params = vec![
            ("api_key".to_string(), self.api_key.clone()),
            ("external_source".to_string(), "imdb_id".to_string()),
        ];

        let value = self
            .retry
            .run("tmdb_find", || self.fetcher.get_json(&url, params.clone()))
            .await?;
        let response: TmdbFindResponse = serde_json::from_value(value)
            .map_err(|e| AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e)))?;

        let poster_url = response
            .best_match()
            .and_then(|result| result.poster_path.as_deref())
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}{}", self.image_base, path));

        tracing::debug!(
            external_id = %external_id,
            found = poster_url.is_some(),
            provider = "tmdb",
            "Poster lookup completed"
        );

        Ok(poster_url)
    }

    pub async fn try_resolve_poster(&self, external_id: &str) -> Outcome<Option<String>> {
        self.find(external_id).await.into()
    }

    /// Poster image URL for an IMDb id, if TMDB has one
    pub async fn resolve_poster(&self, external_id: &str, notices: &mut Notices) -> Option<String> {
        let outcome = self.try_resolve_poster(external_id).await;
        notices.settle(outcome, "Error fetching TMDB data", || None)
    }
}
