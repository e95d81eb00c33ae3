use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::instrument;

/// Anything that turns a prompt into raw text. Implementations do one round
/// trip per call and never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGeneration: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for a local Ollama server (`/api/generate`, non-streaming).
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(client: Client, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::new(client, base_url, model))
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGeneration for OllamaClient {
    #[instrument(
        level = "info",
        skip(self, prompt),
        fields(model = %self.model, prompt_len = prompt.len())
    )]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let payload = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let started = Instant::now();
        let res = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::BackendUnavailable(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            tracing::error!(
                status = status.as_u16(),
                %message,
                "Generation backend rejected request"
            );
            return Err(Error::BackendError {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = res.json().await?;
        let text = body.response.trim().to_string();
        tracing::info!(
            elapsed = ?started.elapsed(),
            response_len = text.len(),
            "Generation backend responded"
        );
        Ok(text)
    }
}
