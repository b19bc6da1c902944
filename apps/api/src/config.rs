use anyhow::{Context, Result};

use crate::llm_client::gemini::DEFAULT_BASE_URL;
use crate::llm_client::CredentialPool;

/// Numbered key variables read in order, then the comma-separated list.
const KEY_VARS: &[&str] = &["GEMINI_API_KEY", "GEMINI_API_KEY2", "GEMINI_API_KEY3"];
const KEY_LIST_VAR: &str = "GEMINI_API_KEYS";

/// Application configuration loaded from environment variables.
///
/// Missing API keys do not fail startup; generation calls then fail with a
/// configuration error. Malformed numeric values do fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: CredentialPool,
    pub gemini_base_url: String,
    pub generation_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut keys: Vec<String> = KEY_VARS.iter().filter_map(|&var| lookup(var)).collect();
        if let Some(list) = lookup(KEY_LIST_VAR) {
            keys.extend(list.split(',').map(str::to_string));
        }

        Ok(Config {
            credentials: CredentialPool::new(keys),
            gemini_base_url: lookup("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            generation_timeout_secs: lookup("GENERATION_TIMEOUT_SECS")
                .unwrap_or_else(|| "120".to_string())
                .parse::<u64>()
                .context("GENERATION_TIMEOUT_SECS must be a whole number of seconds")?,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
