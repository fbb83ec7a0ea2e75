//! HTTP client for the AeroDoc classification/answer API.

use crate::error::ApiError;
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

/// Closed label set returned by `/classify`. The backend normalizes
/// anything it doesn't recognize to `junk`; unknown labels map the same
/// way here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    RagQuery,
    Greeting,
    #[serde(other)]
    Junk,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatAnswer {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Debug, Serialize)]
struct TextRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    label: Label,
}

pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// POST `/classify` — labels user text as a real question, greeting or junk.
    pub async fn classify(&self, text: &str) -> Result<Label, ApiError> {
        let response: ClassifyResponse = self.post("classify", text).await?;
        Ok(response.label)
    }

    /// POST `/chat` — answers a documentation question with sources.
    pub async fn chat(&self, text: &str) -> Result<ChatAnswer, ApiError> {
        self.post("chat", text).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        text: &str,
    ) -> Result<T, ApiError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&TextRequest { text })
            .send()
            .await
            .map_err(|source| ApiError::Request { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                format!("{endpoint} failed (HTTP {status})")
            } else {
                body
            };
            return Err(ApiError::Status(message));
        }

        response
            .json()
            .await
            .map_err(|source| ApiError::Request { endpoint, source })
    }
}
