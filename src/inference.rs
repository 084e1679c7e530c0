//! Remote classification client with primary/fallback endpoint failover.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{is_valid_api_key, Settings, API_KEY_MIN_LEN, API_KEY_PREFIX};
use crate::error::{AnalysisError, Result};
use crate::models::LabelScore;

/// Texts are cut to this many chars before transmission
pub const MAX_INPUT_CHARS: usize = 500;

/// Anything that turns one text into raw label scores.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>>;
}

/// Success bodies come either flat or wrapped in one extra array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifierResponse {
    Flat(Vec<LabelScore>),
    Nested(Vec<Vec<LabelScore>>),
}

impl ClassifierResponse {
    fn into_scores(self) -> Vec<LabelScore> {
        match self {
            ClassifierResponse::Flat(scores) => scores,
            ClassifierResponse::Nested(outer) => outer.into_iter().next().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoadingBody {
    estimated_time: Option<f64>,
}

/// Truncate to [`MAX_INPUT_CHARS`] on a char boundary.
pub fn truncate_input(text: &str) -> String {
    text.chars().take(MAX_INPUT_CHARS).collect()
}

#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: Client,
    api_key: Option<String>,
    primary_url: String,
    fallback_url: String,
}

impl InferenceClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.http_timeout)
            .build()
            .map_err(|e| AnalysisError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            primary_url: settings.primary_url.clone(),
            fallback_url: settings.fallback_url.clone(),
        })
    }

    fn credential(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            None | Some("") => Err(AnalysisError::Configuration(
                "HF_API_KEY is not set".to_string(),
            )),
            Some(key) if !is_valid_api_key(key) => Err(AnalysisError::Configuration(format!(
                "HF_API_KEY must start with '{}' and be longer than {} characters",
                API_KEY_PREFIX, API_KEY_MIN_LEN
            ))),
            Some(key) => Ok(key),
        }
    }

    async fn post(&self, url: &str, api_key: &str, text: &str) -> Result<Vec<LabelScore>> {
        let payload = serde_json::json!({
            "inputs": text,
            "options": { "wait_for_model": true, "use_cache": false }
        });

        debug!(url = %url, chars = text.chars().count(), "sending classification request");

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        if status.is_success() {
            return serde_json::from_str::<ClassifierResponse>(&body)
                .map(ClassifierResponse::into_scores)
                .map_err(|e| AnalysisError::ResponseFormat(e.to_string()));
        }

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AnalysisError::Auth { status: status.as_u16() },
            StatusCode::TOO_MANY_REQUESTS => AnalysisError::RateLimit,
            StatusCode::SERVICE_UNAVAILABLE => AnalysisError::ModelLoading {
                estimated_wait: serde_json::from_str::<LoadingBody>(&body)
                    .ok()
                    .and_then(|b| b.estimated_time),
            },
            StatusCode::NOT_FOUND => AnalysisError::ModelUnavailable { url: url.to_string() },
            _ => AnalysisError::Request { status: status.as_u16(), body },
        })
    }
}

#[async_trait]
impl Classifier for InferenceClient {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>> {
        let api_key = self.credential()?;
        let input = truncate_input(text);

        match self.post(&self.primary_url, api_key, &input).await {
            Err(AnalysisError::ModelUnavailable { .. }) => {
                warn!(
                    primary = %self.primary_url,
                    fallback = %self.fallback_url,
                    "🔄 Primary model returned 404, retrying on fallback"
                );
                self.post(&self.fallback_url, api_key, &input).await
            }
            other => other,
        }
    }
}
