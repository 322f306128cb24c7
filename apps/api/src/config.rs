use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if the completion backend credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub completion_model: String,
    pub completion_temperature: f32,
    pub completion_timeout: Duration,
    pub projects_file: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: optional_env("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            completion_model: optional_env("COMPLETION_MODEL", "gpt-3.5-turbo"),
            completion_temperature: optional_env("COMPLETION_TEMPERATURE", "0.7")
                .parse::<f32>()
                .context("COMPLETION_TEMPERATURE must be a number")?,
            completion_timeout: Duration::from_secs(
                optional_env("COMPLETION_TIMEOUT_SECS", "60")
                    .parse::<u64>()
                    .context("COMPLETION_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            projects_file: PathBuf::from(optional_env("PROJECTS_FILE", "projects.json")),
            port: optional_env("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
