use anyhow::{Context, Result};

/// Service configuration loaded from environment variables.
/// Every variable has a default; malformed numeric values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub embedding_url: String,
    pub text_embedding_model: String,
    pub code_embedding_model: String,
    pub http_timeout_secs: u64,
    /// Comma-separated override for the market skill vocabulary.
    pub market_skills: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            github_token: optional_env("GITHUB_TOKEN"),
            github_api_url: env_or("GITHUB_API_URL", "https://api.github.com"),
            embedding_url: env_or("EMBEDDING_URL", "http://localhost:11434"),
            text_embedding_model: env_or("TEXT_EMBEDDING_MODEL", "all-minilm"),
            code_embedding_model: env_or("CODE_EMBEDDING_MODEL", "nomic-embed-text"),
            http_timeout_secs: env_or("HTTP_TIMEOUT_SECS", "15")
                .parse::<u64>()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            market_skills: optional_env("MARKET_SKILLS"),
            port: env_or("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn http_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.http_timeout_secs)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Treats unset and blank values the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
