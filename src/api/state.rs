use std::{sync::Arc, time::Duration};

use crate::{
    config::Config,
    error::AppResult,
    notice::Notice,
    services::{
        providers::{CompletionProvider, CompletionSettings, GroqProvider, HttpFetcher, JsonFetcher},
        ChatEngine, MetadataClient, PosterResolver, SessionStore, SuggestionEngine,
    },
};

/// Shared application state
///
/// Clients are stateless and shared; the only mutable state is the session store.
#[derive(Clone)]
pub struct AppState {
    pub metadata: Arc<MetadataClient>,
    pub posters: Arc<PosterResolver>,
    pub suggestions: Arc<SuggestionEngine>,
    pub chat: Arc<ChatEngine>,
    pub sessions: Arc<SessionStore>,
    /// Configuration problems found at startup, reported by the health check
    pub startup_notices: Arc<Vec<Notice>>,
}

impl AppState {
    /// Wires the production providers from configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let fetcher: Arc<dyn JsonFetcher> = Arc::new(HttpFetcher::new(timeout)?);
        let completion: Arc<dyn CompletionProvider> = Arc::new(GroqProvider::new(
            config.groq_api_key.clone(),
            config.llm_api_url.clone(),
            timeout,
        )?);

        let settings = CompletionSettings {
            model: config.llm_model.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
        };

        let metadata = MetadataClient::new(
            fetcher.clone(),
            config.omdb_api_url.clone(),
            config.omdb_api_key.clone(),
            config.lookup_max_attempts,
        );
        let posters = PosterResolver::new(
            fetcher,
            config.tmdb_api_url.clone(),
            config.tmdb_api_key.clone(),
            config.tmdb_image_base.clone(),
            config.lookup_max_attempts,
        );

        let startup_notices = config
            .missing_keys()
            .into_iter()
            .map(|key| Notice::error(format!("{} not found in environment variables", key)))
            .collect();

        Ok(Self::new(
            metadata,
            posters,
            SuggestionEngine::new(completion.clone(), settings.clone()),
            ChatEngine::new(completion, settings, config.chat_context_turns),
            SessionStore::new(config.session_idle_minutes),
        )
        .with_startup_notices(startup_notices))
    }

    pub fn new(
        metadata: MetadataClient,
        posters: PosterResolver,
        suggestions: SuggestionEngine,
        chat: ChatEngine,
        sessions: SessionStore,
    ) -> Self {
        Self {
            metadata: Arc::new(metadata),
            posters: Arc::new(posters),
            suggestions: Arc::new(suggestions),
            chat: Arc::new(chat),
            sessions: Arc::new(sessions),
            startup_notices: Arc::new(Vec::new()),
        }
    }

    pub fn with_startup_notices(mut self, notices: Vec<Notice>) -> Self {
        self.startup_notices = Arc::new(notices);
        self
    }
}
