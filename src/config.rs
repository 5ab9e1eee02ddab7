use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// OMDb API key used for title search and details
    #[serde(default)]
    pub omdb_api_key: Option<String>,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// TMDB API key used for poster lookups
    #[serde(default = "default_tmdb_api_key")]
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix prepended to TMDB poster paths
    #[serde(default = "default_tmdb_image_base")]
    pub tmdb_image_base: String,

    /// Groq API key for the chat completion endpoint
    #[serde(default)]
    pub groq_api_key: Option<String>,

    /// OpenAI-compatible chat completion base URL
    #[serde(default = "default_llm_api_url")]
    pub llm_api_url: String,

    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    #[serde(default = "default_llm_temperature")]
    pub llm_temperature: f32,

    #[serde(default = "default_llm_max_tokens")]
    pub llm_max_tokens: u32,

    /// Per-attempt timeout for every outbound call, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Attempts made by retried lookups (details and posters)
    #[serde(default = "default_lookup_max_attempts")]
    pub lookup_max_attempts: u32,

    /// Prior chat turns forwarded to the model as context (0 keeps every turn stateless)
    #[serde(default)]
    pub chat_context_turns: usize,

    /// Chat sessions idle for longer than this are dropped
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: i64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_omdb_api_url() -> String {
    "https://www.omdbapi.com/".to_string()
}

// Public demo key, usable when no personal key is configured
fn default_tmdb_api_key() -> String {
    "3d1cb94d909aab088231f5af899dffdc".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_llm_api_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_llm_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_llm_temperature() -> f32 {
    0.7
}

fn default_llm_max_tokens() -> u32 {
    500
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_lookup_max_attempts() -> u32 {
    3
}

fn default_session_idle_minutes() -> i64 {
    60
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Required secrets that are absent or blank, by environment variable name
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.omdb_api_key) {
            missing.push("OMDB_API_KEY");
        }
        if is_blank(&self.groq_api_key) {
            missing.push("GROQ_API_KEY");
        }
        missing
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        let vars = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>();
        envy::from_iter::<_, Config>(vars).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.lookup_max_attempts, 3);
        assert_eq!(config.llm_max_tokens, 500);
        assert_eq!(config.llm_model, "llama-3.3-70b-versatile");
        assert_eq!(config.chat_context_turns, 0);
        assert_eq!(config.tmdb_image_base, "https://image.tmdb.org/t/p/w500");
        assert!(!config.tmdb_api_key.is_empty());
    }

    #[test]
    fn test_missing_keys_reported() {
        let config = from_pairs(&[("OMDB_API_KEY", "  ")]);
        assert_eq!(config.missing_keys(), vec!["OMDB_API_KEY", "GROQ_API_KEY"]);

        let config = from_pairs(&[("OMDB_API_KEY", "abc"), ("GROQ_API_KEY", "gsk")]);
        assert!(config.missing_keys().is_empty());
    }
}
