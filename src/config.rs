use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// OpenRouter API key
    pub openrouter_api_key: String,

    /// OpenRouter (OpenAI-compatible) API base URL
    #[serde(default = "default_openrouter_api_url")]
    pub openrouter_api_url: String,

    /// Completion model used to propose titles
    #[serde(default = "default_inference_model")]
    pub inference_model: String,

    /// Public URL of the site, sent as the HTTP-Referer to OpenRouter
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Redis connection URL. Metadata responses are not cached when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// TTL for cached metadata responses, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_openrouter_api_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_inference_model() -> String {
    "openai/gpt-4o-mini".to_string()
}

fn default_site_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    3600
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

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
