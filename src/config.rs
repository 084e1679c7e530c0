//! Environment-driven settings.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PRIMARY_URL: &str =
    "https://api-inference.huggingface.co/models/cardiffnlp/twitter-roberta-base-sentiment-latest";
pub const DEFAULT_FALLBACK_URL: &str =
    "https://api-inference.huggingface.co/models/distilbert-base-uncased-finetuned-sst-2-english";

/// Required prefix for inference API tokens
pub const API_KEY_PREFIX: &str = "hf_";
/// Tokens must be strictly longer than this
pub const API_KEY_MIN_LEN: usize = 10;

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub primary_url: String,
    pub fallback_url: String,
    pub request_delay: Duration,
    pub http_timeout: Duration,
    pub data_dir: PathBuf,
    pub bind_addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            primary_url: DEFAULT_PRIMARY_URL.to_string(),
            fallback_url: DEFAULT_FALLBACK_URL.to_string(),
            request_delay: Duration::from_millis(2000),
            http_timeout: Duration::from_secs(30),
            data_dir: PathBuf::from("data"),
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment. Call `dotenv().ok()` first.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup; unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let parse_u64 = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u64>().ok());

        Self {
            api_key: lookup("HF_API_KEY")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            primary_url: lookup("SENTIMENT_PRIMARY_URL").unwrap_or(defaults.primary_url),
            fallback_url: lookup("SENTIMENT_FALLBACK_URL").unwrap_or(defaults.fallback_url),
            request_delay: parse_u64("SENTIMENT_REQUEST_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_delay),
            http_timeout: parse_u64("SENTIMENT_HTTP_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            data_dir: lookup("SENTIMENT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            bind_addr: lookup("SENTIMENT_BIND_ADDR").unwrap_or(defaults.bind_addr),
        }
    }

    /// Live analysis is possible only with a well-formed key.
    pub fn has_valid_api_key(&self) -> bool {
        self.api_key.as_deref().map(is_valid_api_key).unwrap_or(false)
    }
}

pub fn is_valid_api_key(key: &str) -> bool {
    key.starts_with(API_KEY_PREFIX) && key.len() > API_KEY_MIN_LEN
}
