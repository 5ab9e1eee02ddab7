//! OMDb metadata client
//!
//! Three lookups against the same endpoint, distinguished by query parameter:
//! `s=` (search list), `t=` (best match by title) and `i=` (details by IMDb id).
//! Only the details lookup is retried, and only on timeouts.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::{Candidate, ContentType, Details, OmdbSearchResponse, OmdbTitle},
    notice::{Notices, Outcome},
    retry::RetryPolicy,
    services::providers::JsonFetcher,
};

type QueryParams = Vec<(String, String)>;

pub struct MetadataClient {
    fetcher: Arc<dyn JsonFetcher>,
    api_url: String,
    api_key: Option<String>,
    details_retry: RetryPolicy,
}

impl MetadataClient {
    pub fn new(
        fetcher: Arc<dyn JsonFetcher>,
        api_url: String,
        api_key: Option<String>,
        max_attempts: u32,
    ) -> Self {
        Self {
            fetcher,
            api_url,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            details_retry: RetryPolicy::on_timeout(max_attempts),
        }
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::MissingConfiguration("OMDB_API_KEY".to_string()))
    }

    fn params(&self, pairs: &[(&str, &str)]) -> AppResult<QueryParams> {
        let api_key = self.api_key()?;
        let mut params: QueryParams = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        params.push(("apikey".to_string(), api_key.to_string()));
        Ok(params)
    }

    async fn get<T: DeserializeOwned>(&self, params: QueryParams) -> AppResult<T> {
        let value = self.fetcher.get_json(&self.api_url, params).await?;
        decode(value)
    }

    async fn search(
        &self,
        query: &str,
        year: Option<i32>,
        limit: usize,
        content_type: ContentType,
    ) -> AppResult<Vec<Candidate>> {
        let year = year.map(|y| y.to_string()).unwrap_or_default();
        let params = self.params(&[
            ("s", query),
            ("y", year.as_str()),
            ("type", content_type.as_str()),
        ])?;
        let response: OmdbSearchResponse = self.get(params).await?;
        if !response.is_match() {
            return Err(AppError::NotFound(
                response.error.unwrap_or_else(|| query.to_string()),
            ));
        }

        let candidates: Vec<Candidate> = response
            .search
            .into_iter()
            .take(limit)
            .map(Candidate::from)
            .collect();

        tracing::info!(
            query = %query,
            results = candidates.len(),
            provider = "omdb",
            "Title search completed"
        );

        Ok(candidates)
    }

    async fn lookup_title(&self, title: &str, content_type: ContentType) -> AppResult<Details> {
        let params = self.params(&[("t", title), ("type", content_type.as_str())])?;
        let response: OmdbTitle = self.get(params).await?;
        if !response.is_match() {
            tracing::debug!(title = %title, provider = "omdb", "No title match");
            return Err(AppError::NotFound(title.to_string()));
        }
        Ok(response.into_details(""))
    }

    async fn lookup_details(&self, external_id: &str) -> AppResult<Details> {
        let params = self.params(&[("i", external_id)])?;
        let response: OmdbTitle = self
            .details_retry
            .run("omdb_details", || self.get(params.clone()))
            .await?;
        if !response.is_match() {
            return Err(AppError::NotFound(external_id.to_string()));
        }
        Ok(response.into_details(external_id))
    }

    /// Search titles matching `query`, keeping the first `limit` in provider order
    pub async fn try_search_by_query(
        &self,
        query: &str,
        year: Option<i32>,
        limit: usize,
        content_type: ContentType,
    ) -> Outcome<Vec<Candidate>> {
        self.search(query, year, limit, content_type).await.into()
    }

    pub async fn search_by_query(
        &self,
        query: &str,
        year: Option<i32>,
        limit: usize,
        content_type: ContentType,
        notices: &mut Notices,
    ) -> Vec<Candidate> {
        let outcome = self
            .try_search_by_query(query, year, limit, content_type)
            .await;
        notices.settle(outcome, "Error fetching movies", Vec::new)
    }

    /// Best single match for a title
    pub async fn try_search_by_title(
        &self,
        title: &str,
        content_type: ContentType,
    ) -> Outcome<Details> {
        self.lookup_title(title, content_type).await.into()
    }

    pub async fn search_by_title(
        &self,
        title: &str,
        content_type: ContentType,
        notices: &mut Notices,
    ) -> Option<Details> {
        let outcome = self.try_search_by_title(title, content_type).await;
        notices.settle(
            outcome.map(Some),
            &format!("Error searching for {}", title),
            || None,
        )
    }

    /// Details by IMDb id, retried on timeouts
    pub async fn try_fetch_details(&self, external_id: &str) -> Outcome<Details> {
        self.lookup_details(external_id).await.into()
    }

    /// Details by IMDb id; the placeholder record stands in when they cannot be loaded
    pub async fn fetch_details(&self, external_id: &str, notices: &mut Notices) -> Details {
        let outcome = self.try_fetch_details(external_id).await;
        notices.settle(outcome, "Error fetching movie details", || {
            Details::unavailable(external_id)
        })
    }
}

fn decode<T: DeserializeOwned>(value: serde_json::Value) -> AppResult<T> {
    serde_json::from_value(value)
        .map_err(|e| AppError::ExternalApi(format!("Failed to parse OMDb response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockJsonFetcher;
    use serde_json::json;

    fn client(fetcher: MockJsonFetcher) -> MetadataClient {
        MetadataClient::new(
            Arc::new(fetcher),
            "http://omdb.test/".to_string(),
            Some("test_key".to_string()),
            3,
        )
    }

    fn has_param(params: &[(String, String)], key: &str, value: &str) -> bool {
        params.iter().any(|(k, v)| k == key && v == value)
    }

    fn search_payload(count: usize) -> serde_json::Value {
        let hits: Vec<_> = (0..count)
            .map(|i| {
                json!({
                    "Title": format!("Title {}", i),
                    "Year": format!("{}", 2000 + i),
                    "imdbID": format!("tt000000{}", i),
                    "Type": "movie"
                })
            })
            .collect();
        json!({ "Search": hits, "totalResults": count.to_string(), "Response": "True" })
    }

    fn matrix_payload() -> serde_json::Value {
        json!({
            "Title": "The Matrix",
            "Year": "1999",
            "Plot": "A hacker discovers reality is a simulation.",
            "Poster": "https://m.media-amazon.com/matrix.jpg",
            "imdbRating": "8.7",
            "Actors": "Keanu Reeves",
            "Director": "The Wachowskis",
            "Genre": "Action, Sci-Fi",
            "Language": "English",
            "Country": "United States",
            "Awards": "Won 4 Oscars",
            "imdbID": "tt0133093",
            "Response": "True"
        })
    }

    #[tokio::test]
    async fn test_search_truncates_to_limit_in_order() {
        let mut fetcher = MockJsonFetcher::new();
        fetcher
            .expect_get_json()
            .withf(|url, params| {
                url == "http://omdb.test/"
                    && has_param(params, "s", "space")
                    && has_param(params, "y", "")
                    && has_param(params, "type", "movie")
                    && has_param(params, "apikey", "test_key")
            })
            .times(1)
            .returning(|_, _| Ok(search_payload(8)));

        let mut notices = Notices::new();
        let results = client(fetcher)
            .search_by_query("space", None, 5, ContentType::Movie, &mut notices)
            .await;

        assert_eq!(results.len(), 5);
        let ids: Vec<_> = results.iter().map(|c| c.external_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["tt0000000", "tt0000001", "tt0000002", "tt0000003", "tt0000004"]
        );
        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn test_search_passes_year_and_series_type() {
        let mut fetcher = MockJsonFetcher::new();
        fetcher
            .expect_get_json()
            .withf(|_, params| has_param(params, "y", "2015") && has_param(params, "type", "series"))
            .times(1)
            .returning(|_, _| Ok(search_payload(2)));

        let mut notices = Notices::new();
        let results = client(fetcher)
            .search_by_query("crime", Some(2015), 10, ContentType::Series, &mut notices)
            .await;
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_search_no_match_is_empty_without_notice() {
        let mut fetcher = MockJsonFetcher::new();
        fetcher
            .expect_get_json()
            .times(1)
            .returning(|_, _| Ok(json!({"Response": "False", "Error": "Movie not found!"})));

        let mut notices = Notices::new();
        let results = client(fetcher)
            .search_by_query("zzzz", None, 5, ContentType::Movie, &mut notices)
            .await;
        assert!(results.is_empty());
        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_is_reported_and_not_retried() {
        let mut fetcher = MockJsonFetcher::new();
        fetcher
            .expect_get_json()
            .times(1)
            .returning(|_, _| Err(AppError::Timeout("http://omdb.test/".into())));

        let mut notices = Notices::new();
        let results = client(fetcher)
            .search_by_query("space", None, 5, ContentType::Movie, &mut notices)
            .await;
        assert!(results.is_empty());
        assert_eq!(notices.len(), 1);
    }

    #[tokio::test]
    async fn test_search_by_title_found() {
        let mut fetcher = MockJsonFetcher::new();
        fetcher
            .expect_get_json()
            .withf(|_, params| has_param(params, "t", "The Matrix"))
            .times(1)
            .returning(|_, _| Ok(matrix_payload()));

        let mut notices = Notices::new();
        let details = client(fetcher)
            .search_by_title("The Matrix", ContentType::Movie, &mut notices)
            .await
            .unwrap();
        assert_eq!(details.external_id, "tt0133093");
        assert_eq!(details.director, "The Wachowskis");
    }

    #[tokio::test]
    async fn test_search_by_title_no_match_is_absent() {
        let mut fetcher = MockJsonFetcher::new();
        fetcher
            .expect_get_json()
            .times(1)
            .returning(|_, _| Ok(json!({"Response": "False", "Error": "Movie not found!"})));

        let mut notices = Notices::new();
        let details = client(fetcher)
            .search_by_title("Not A Real Film", ContentType::Movie, &mut notices)
            .await;
        assert!(details.is_none());
        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_details_gives_up_after_three_timeouts() {
        let mut fetcher = MockJsonFetcher::new();
        fetcher
            .expect_get_json()
            .withf(|_, params| has_param(params, "i", "tt0133093"))
            .times(3)
            .returning(|_, _| Err(AppError::Timeout("http://omdb.test/".into())));

        let mut notices = Notices::new();
        let details = client(fetcher)
            .fetch_details("tt0133093", &mut notices)
            .await;

        assert_eq!(details.title, "Error loading details");
        assert_eq!(details.plot, "Unable to load movie details");
        assert_eq!(details.poster, "");
        assert_eq!(details.rating.to_string(), "N/A");
        assert_eq!(details.cast, "Not available");
        assert_eq!(notices.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_details_recovers_after_timeout() {
        let mut fetcher = MockJsonFetcher::new();
        let mut seq = mockall::Sequence::new();
        fetcher
            .expect_get_json()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(AppError::Timeout("http://omdb.test/".into())));
        fetcher
            .expect_get_json()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(matrix_payload()));

        let mut notices = Notices::new();
        let details = client(fetcher)
            .fetch_details("tt0133093", &mut notices)
            .await;
        assert_eq!(details.title, "The Matrix");
        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_details_other_failure_not_retried() {
        let mut fetcher = MockJsonFetcher::new();
        fetcher
            .expect_get_json()
            .times(1)
            .returning(|_, _| Err(AppError::ExternalApi("API returned status 500".into())));

        let mut notices = Notices::new();
        let details = client(fetcher).fetch_details("tt0133093", &mut notices).await;
        assert!(details.is_unavailable());
        assert_eq!(notices.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_api_key_skips_network() {
        let client = MetadataClient::new(
            Arc::new(MockJsonFetcher::new()),
            "http://omdb.test/".to_string(),
            None,
            3,
        );

        let mut notices = Notices::new();
        let results = client
            .search_by_query("space", None, 5, ContentType::Movie, &mut notices)
            .await;
        assert!(results.is_empty());
        assert_eq!(notices.len(), 1);
        assert!(notices.iter().next().unwrap().message.contains("OMDB_API_KEY"));
    }
}
