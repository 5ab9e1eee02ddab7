use crate::{
    models::{Candidate, ContentType, RatingTier, RecommendedTitle, SuggestionRequest},
    notice::Notices,
    services::{
        metadata::MetadataClient, poster::PosterResolver, rating, suggestions::SuggestionEngine,
    },
};

/// Generates recommendations for the structured search form
///
/// Asks the model for titles, then resolves each one in turn against the metadata
/// provider and looks up its poster. Titles the provider does not know are dropped.
pub async fn recommend(
    suggestions: &SuggestionEngine,
    metadata: &MetadataClient,
    posters: &PosterResolver,
    request: &SuggestionRequest,
    notices: &mut Notices,
) -> Vec<RecommendedTitle> {
    let titles = suggestions.suggest_titles(request, notices).await;
    if titles.is_empty() {
        notices.warn("No suggestions found. Try different search terms.");
        return Vec::new();
    }

    let mut results = Vec::with_capacity(titles.len());
    for title in &titles {
        let Some(details) = metadata
            .search_by_title(title, request.content_type, notices)
            .await
        else {
            tracing::debug!(title = %title, "Suggested title did not resolve");
            continue;
        };
        let poster_url = posters.resolve_poster(&details.external_id, notices).await;
        results.push(RecommendedTitle::new(details, poster_url));
    }

    tracing::info!(
        suggested = titles.len(),
        resolved = results.len(),
        "Recommendations assembled"
    );

    results
}

/// Catalogue search narrowed to a rating tier
pub async fn discover(
    metadata: &MetadataClient,
    query: &str,
    year: Option<i32>,
    limit: usize,
    content_type: ContentType,
    tier: RatingTier,
    notices: &mut Notices,
) -> Vec<Candidate> {
    let candidates = metadata
        .search_by_query(query, year, limit, content_type, notices)
        .await;
    rating::filter(candidates, tier, metadata, notices).await
}

/// Everything the detail view shows for one title
pub async fn title_details(
    metadata: &MetadataClient,
    posters: &PosterResolver,
    external_id: &str,
    notices: &mut Notices,
) -> RecommendedTitle {
    let details = metadata.fetch_details(external_id, notices).await;
    let poster_url = if details.is_unavailable() {
        None
    } else {
        posters.resolve_poster(external_id, notices).await
    };
    RecommendedTitle::new(details, poster_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        services::providers::{CompletionSettings, MockCompletionProvider, MockJsonFetcher},
    };
    use serde_json::json;
    use std::sync::Arc;

    fn query_value(params: &[(String, String)], key: &str) -> Option<String> {
        params.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    fn omdb() -> MockJsonFetcher {
        let mut fetcher = MockJsonFetcher::new();
        fetcher.expect_get_json().returning(|_, params| {
            match query_value(&params, "t").as_deref() {
                Some("Inception") => Ok(json!({
                    "Title": "Inception", "Year": "2010", "imdbRating": "8.8",
                    "imdbID": "tt1375666", "Response": "True"
                })),
                Some("Interstellar") => Ok(json!({
                    "Title": "Interstellar", "Year": "2014", "imdbRating": "8.7",
                    "imdbID": "tt0816692", "Response": "True"
                })),
                _ => Ok(json!({"Response": "False", "Error": "Movie not found!"})),
            }
        });
        fetcher
    }

    fn tmdb() -> MockJsonFetcher {
        let mut fetcher = MockJsonFetcher::new();
        fetcher.expect_get_json().returning(|url, _| {
            if url.ends_with("tt1375666") {
                Ok(json!({"movie_results": [{"poster_path": "/inception.jpg"}], "tv_results": []}))
            } else {
                Ok(json!({"movie_results": [], "tv_results": []}))
            }
        });
        fetcher
    }

    fn clients(
        completion: MockCompletionProvider,
    ) -> (SuggestionEngine, MetadataClient, PosterResolver) {
        (
            SuggestionEngine::new(Arc::new(completion), CompletionSettings::default()),
            MetadataClient::new(
                Arc::new(omdb()),
                "http://omdb.test/".to_string(),
                Some("key".to_string()),
                3,
            ),
            PosterResolver::new(
                Arc::new(tmdb()),
                "http://tmdb.test/3".to_string(),
                "key".to_string(),
                "https://image.tmdb.org/t/p/w500".to_string(),
                3,
            ),
        )
    }

    #[tokio::test]
    async fn test_unresolved_titles_are_dropped() {
        let mut completion = MockCompletionProvider::new();
        completion
            .expect_complete()
            .returning(|_| Ok("Inception\nSure, here you go:\nInterstellar".to_string()));
        completion.expect_name().return_const("mock");

        let (suggestions, metadata, posters) = clients(completion);
        let mut notices = Notices::new();
        let results = recommend(
            &suggestions,
            &metadata,
            &posters,
            &SuggestionRequest::new("Sci-Fi"),
            &mut notices,
        )
        .await;

        let titles: Vec<_> = results.iter().map(|r| r.details.title.as_str()).collect();
        assert_eq!(titles, vec!["Inception", "Interstellar"]);
        assert_eq!(
            results[0].poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/inception.jpg")
        );
        assert!(results[1].poster_url.is_none());
        assert_eq!(results[1].imdb_url, "https://www.imdb.com/title/tt0816692/");
        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_warns_and_returns_nothing() {
        let mut completion = MockCompletionProvider::new();
        completion
            .expect_complete()
            .returning(|_| Err(AppError::Model("unavailable".into())));

        let (suggestions, metadata, posters) = clients(completion);
        let mut notices = Notices::new();
        let results = recommend(
            &suggestions,
            &metadata,
            &posters,
            &SuggestionRequest::new("Sci-Fi"),
            &mut notices,
        )
        .await;

        assert!(results.is_empty());
        // One error for the failed call, one warning for the empty result
        assert_eq!(notices.len(), 2);
    }

    #[tokio::test]
    async fn test_title_details_skips_poster_for_placeholder() {
        let mut fetcher = MockJsonFetcher::new();
        fetcher
            .expect_get_json()
            .times(3)
            .returning(|_, _| Err(AppError::Timeout("omdb".into())));
        let metadata = MetadataClient::new(
            Arc::new(fetcher),
            "http://omdb.test/".to_string(),
            Some("key".to_string()),
            3,
        );
        let posters = PosterResolver::new(
            Arc::new(MockJsonFetcher::new()),
            "http://tmdb.test/3".to_string(),
            "key".to_string(),
            "https://image.tmdb.org/t/p/w500".to_string(),
            3,
        );

        let mut notices = Notices::new();
        let result = title_details(&metadata, &posters, "tt1375666", &mut notices).await;
        assert!(result.details.is_unavailable());
        assert!(result.poster_url.is_none());
    }
}
