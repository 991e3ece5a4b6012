use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_ENDPOINT, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Presence of a key switches the AI enhancement layer on.
    pub grok_api_key: Option<String>,
    pub grok_model: String,
    pub grok_base_url: String,
    pub ranking_default_limit: usize,
    pub matches_default_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            grok_api_key: std::env::var("GROK_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            grok_model: std::env::var("GROK_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            grok_base_url: std::env::var("GROK_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            ranking_default_limit: parse_limit("RANKING_DEFAULT_LIMIT", 25)?,
            matches_default_limit: parse_limit("MATCHES_DEFAULT_LIMIT", 10)?,
        })
    }

    /// Configuration for tests and tooling that never reach a real database.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/competency_test".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            grok_api_key: None,
            grok_model: DEFAULT_MODEL.to_string(),
            grok_base_url: DEFAULT_ENDPOINT.to_string(),
            ranking_default_limit: 25,
            matches_default_limit: 10,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_limit(key: &str, default: usize) -> Result<usize> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("{key} must be a non-negative integer")),
        Err(_) => Ok(default),
    }
}
