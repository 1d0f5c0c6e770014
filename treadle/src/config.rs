//! Configuration for building a runner from the environment.

/// Environment-derived settings consumed by [`crate::build`].
///
/// Binaries load `.env` themselves (via `dotenv`) before calling
/// [`BuildConfig::from_env`]; the library never touches the filesystem.
#[derive(Clone, Debug, Default)]
pub struct BuildConfig {
    /// API key for the OpenAI-compatible endpoint. Required to build LLMs.
    pub openai_api_key: Option<String>,
    /// Override for the API base URL (e.g. a proxy or compatible server).
    pub openai_base_url: Option<String>,
    /// Chat model name; defaults to `gpt-4o-mini` when unset.
    pub model: Option<String>,
    /// Exa API key; when unset the solver runs without web search.
    pub exa_api_key: Option<String>,
    /// Override for the execute-replan cycle cap.
    pub max_cycles: Option<u32>,
}

impl BuildConfig {
    /// Builds config from environment variables.
    pub fn from_env() -> Self {
        Self {
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .or_else(|_| std::env::var("OPENAI_API_BASE"))
                .ok(),
            model: std::env::var("MODEL")
                .or_else(|_| std::env::var("OPENAI_MODEL"))
                .ok(),
            exa_api_key: std::env::var("EXA_API_KEY").ok(),
            max_cycles: std::env::var("MAX_CYCLES")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }
}
