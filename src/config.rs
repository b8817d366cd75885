use serde::Deserialize;
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LLM_API_URL: &str = "http://localhost:1234/v1/chat/completions";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 600_000;
const DEFAULT_MODEL: &str = "grok-2-1212";

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub llm_api_url: String,
    pub llm_api_key: String,
    /// Timeout for the chat-completion call, in milliseconds.
    pub request_timeout_ms: u64,
    /// Model used when a request does not name one.
    pub model_name: String,
    pub max_file_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            llm_api_url: DEFAULT_LLM_API_URL.to_string(),
            llm_api_key: String::new(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            model_name: DEFAULT_MODEL.to_string(),
            max_file_size: default_max_file_size(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't have to touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {}", raw))?,
            None => defaults.port,
        };

        let request_timeout_ms = match lookup("REQUEST_TIMEOUT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid REQUEST_TIMEOUT value: {}", raw))?,
            None => defaults.request_timeout_ms,
        };

        Ok(Config {
            port,
            llm_api_url: lookup("LLM_API_URL").unwrap_or(defaults.llm_api_url),
            llm_api_key: lookup("LLM_API_KEY").unwrap_or(defaults.llm_api_key),
            request_timeout_ms,
            model_name: lookup("MODEL_NAME").unwrap_or(defaults.model_name),
            max_file_size: defaults.max_file_size,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

pub fn load_config() -> Result<Config> {
    Config::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn falls_back_to_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.llm_api_url, DEFAULT_LLM_API_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(600));
        assert_eq!(config.model_name, "grok-2-1212");
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("LLM_API_URL", "https://llm.internal/v1/chat/completions"),
            ("LLM_API_KEY", "secret"),
            ("REQUEST_TIMEOUT", "1500"),
            ("MODEL_NAME", "qwen2-7b-instruct"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.llm_api_key, "secret");
        assert_eq!(config.request_timeout(), Duration::from_millis(1500));
        assert_eq!(config.model_name, "qwen2-7b-instruct");
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let err = Config::from_lookup(lookup_from(&[("REQUEST_TIMEOUT", "ten minutes")])).unwrap_err();
        assert!(err.to_string().contains("REQUEST_TIMEOUT"));
    }
}
