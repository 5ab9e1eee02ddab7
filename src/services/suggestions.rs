//! Title suggestions from the language model
//!
//! The model is asked for bare titles, one per line. The reply is trusted: lines are
//! trimmed and blanks dropped, nothing more. Lines that are not real titles simply
//! fail to resolve later and fall out of the result list.

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::SuggestionRequest,
    notice::{Notices, Outcome},
    services::providers::{ChatMessage, CompletionProvider, CompletionRequest, CompletionSettings},
};

const SYSTEM_PROMPT: &str = "You are a knowledgeable movie and TV series expert. \
Based on the given parameters, suggest relevant titles from specific film industries. \
Only provide the exact titles without any additional text or explanation.\n\
For Bollywood, suggest Hindi movies; for Hollywood, suggest American/English movies; \
for Tollywood, suggest Telugu movies.\n\
When given a year range, suggest titles released during that period.\n\
Provide one title per line.";

pub struct SuggestionEngine {
    provider: Arc<dyn CompletionProvider>,
    settings: CompletionSettings,
}

impl SuggestionEngine {
    pub fn new(provider: Arc<dyn CompletionProvider>, settings: CompletionSettings) -> Self {
        Self { provider, settings }
    }

    /// Parameter block describing the requested facets
    pub fn build_prompt(request: &SuggestionRequest) -> String {
        format!(
            "Suggest {count} {content_type} with these criteria:\n\
             - Genre: {genre}\n\
             - Release Period: {years}\n\
             - Type: {suggestion_type}\n\
             - Rating category: {rating}\n\
             - Industry: {industry}\n\n\
             Format: Only provide the exact titles, one per line. No additional text.",
            count = request.count,
            content_type = request.content_type.plural(),
            genre = request.genre.trim(),
            years = request.year_range,
            suggestion_type = request.suggestion_type,
            rating = request.rating_tier,
            industry = request.industry,
        )
    }

    async fn request_titles(&self, request: &SuggestionRequest) -> AppResult<Vec<String>> {
        let completion = CompletionRequest::new(
            &self.settings,
            vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(Self::build_prompt(request)),
            ],
        );
        let reply = self.provider.complete(completion).await?;
        let titles = parse_titles(&reply);

        tracing::info!(
            genre = %request.genre,
            requested = request.count,
            received = titles.len(),
            provider = self.provider.name(),
            "Suggestions received"
        );

        Ok(titles)
    }

    pub async fn try_suggest_titles(&self, request: &SuggestionRequest) -> Outcome<Vec<String>> {
        self.request_titles(request).await.into()
    }

    /// Suggested titles; empty when the model cannot be reached
    pub async fn suggest_titles(
        &self,
        request: &SuggestionRequest,
        notices: &mut Notices,
    ) -> Vec<String> {
        let outcome = self.try_suggest_titles(request).await;
        notices.settle(outcome, "Error getting AI suggestions", Vec::new)
    }
}

/// One title per non-blank line, surrounding whitespace removed
pub fn parse_titles(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
