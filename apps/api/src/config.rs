use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODEL;
use crate::security::rate_limit::RateLimit;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub groq_api_key: String,
    pub groq_model: String,
    pub port: u16,
    pub rust_log: String,
    pub search_rate_limit: RateLimit,
    pub chat_rate_limit: RateLimit,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let window = Duration::from_secs(parse_env("RATE_LIMIT_WINDOW_SECS", 60)?);

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            groq_api_key: require_env("GROQ_API_KEY")?,
            groq_model: std::env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            search_rate_limit: RateLimit::new(parse_env("SEARCH_RATE_LIMIT", 30)?, window),
            chat_rate_limit: RateLimit::new(parse_env("CHAT_RATE_LIMIT", 20)?, window),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads and parses an optional variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_defaults_when_unset() {
        let port: u16 = parse_env("JOBMATCH_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_require_env_names_missing_key() {
        let err = require_env("JOBMATCH_TEST_MISSING_KEY").unwrap_err();
        assert!(err.to_string().contains("JOBMATCH_TEST_MISSING_KEY"));
    }
}
