use anyhow::{bail, Context, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:1234/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "mistral-nemo-instruct-2407";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Everything the LLM client needs to reach the chat-completion endpoint.
/// Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointConfig {
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: Some(DEFAULT_MAX_TOKENS),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every variable is optional; defaults target a local LM Studio server.
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: EndpointConfig,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let temperature = match lookup("RESUME_ADVISOR_TEMPERATURE") {
            Some(raw) => raw
                .trim()
                .parse::<f32>()
                .context("RESUME_ADVISOR_TEMPERATURE must be a number")?,
            None => DEFAULT_TEMPERATURE,
        };
        if !(0.0..=2.0).contains(&temperature) {
            bail!("RESUME_ADVISOR_TEMPERATURE must be between 0.0 and 2.0, got {temperature}");
        }

        let max_tokens = match lookup("RESUME_ADVISOR_MAX_TOKENS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .context("RESUME_ADVISOR_MAX_TOKENS must be a positive integer")?,
            None => DEFAULT_MAX_TOKENS,
        };
        if max_tokens == 0 {
            bail!("RESUME_ADVISOR_MAX_TOKENS must be greater than zero");
        }

        Ok(Config {
            endpoint: EndpointConfig {
                api_url: lookup("RESUME_ADVISOR_API_URL")
                    .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                model: lookup("RESUME_ADVISOR_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                temperature,
                max_tokens: Some(max_tokens),
            },
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "warn".to_string()),
        })
    }
}
