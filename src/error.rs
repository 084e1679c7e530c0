//! Error taxonomy shared by the inference client, scheduler and analyzer.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Missing or malformed API credential
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 401 / 403 from the inference endpoint
    #[error("Authentication failed (HTTP {status}): check that HF_API_KEY is valid")]
    Auth { status: u16 },

    /// 429 from the inference endpoint
    #[error("Rate limit exceeded: wait a moment before submitting more text")]
    RateLimit,

    /// 503 while the remote model warms up
    #[error(
        "Model is loading{}",
        .estimated_wait
            .map(|secs| format!(", estimated wait {:.0}s", secs))
            .unwrap_or_default()
    )]
    ModelLoading { estimated_wait: Option<f64> },

    /// 404 from both primary and fallback endpoints
    #[error("Model unavailable at {url}")]
    ModelUnavailable { url: String },

    #[error("Unexpected response format: {0}")]
    ResponseFormat(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed with HTTP {status}: {body}")]
    Request { status: u16, body: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Request scheduler is no longer running")]
    SchedulerClosed,
}

impl From<std::io::Error> for AnalysisError {
    fn from(e: std::io::Error) -> Self {
        AnalysisError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(e: serde_json::Error) -> Self {
        AnalysisError::Storage(e.to_string())
    }
}
