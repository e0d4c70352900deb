//! OpenAI chat completions adapter
//!
//! Works against any OpenAI-compatible endpoint through `with_base_url`.

use async_trait::async_trait;
use copy_variants_domain::{CopyRequest, CopyWriter, CopyWriterError, DraftText};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{LlmConfig, backoff, build_copy_prompt, http_client, parse_copy_response};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Copy writer backed by the chat completions API
pub struct OpenAiCopyWriter {
    client: Client,
    api_key: SecretString,
    base_url: String,
    config: LlmConfig,
}

impl OpenAiCopyWriter {
    pub fn new(api_key: SecretString, config: LlmConfig) -> Result<Self, CopyWriterError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string(), config)
    }

    pub fn with_base_url(
        api_key: SecretString,
        base_url: String,
        config: LlmConfig,
    ) -> Result<Self, CopyWriterError> {
        Ok(Self {
            client: http_client(&config)?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            config,
        })
    }

    async fn call_api(&self, request: &ChatCompletionRequest) -> Result<String, CopyWriterError> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CopyWriterError::Timeout
                } else {
                    CopyWriterError::Api(e.to_string())
                }
            })?;

        if response.status() == 429 {
            return Err(CopyWriterError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CopyWriterError::Api(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CopyWriterError::InvalidFormat(e.to_string()))?;

        let text = api_response
            .choices
            .into_iter()
            .filter_map(|c| c.message.content)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(CopyWriterError::InvalidFormat("Empty response".to_string()));
        }

        Ok(text)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl CopyWriter for OpenAiCopyWriter {
    async fn write(&self, request: CopyRequest) -> Result<Vec<DraftText>, CopyWriterError> {
        let prompt = build_copy_prompt(&request);
        let (model, temperature) = self.config.resolve(&request);
        let body = ChatCompletionRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompt.system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.user,
                },
            ],
            temperature: Some(temperature),
            max_tokens: Some(self.config.max_output_tokens),
        };

        let mut last_error = None;
        for attempt in 0..=self.config.retries {
            if attempt > 0 {
                tracing::warn!(attempt = attempt, "Retrying copy request");
                tokio::time::sleep(backoff(attempt)).await;
            }

            match self.call_api(&body).await {
                Ok(response_text) => match parse_copy_response(&response_text) {
                    Ok(drafts) => return Ok(drafts),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to parse response");
                        last_error = Some(CopyWriterError::InvalidFormat(e));
                    }
                },
                Err(CopyWriterError::RateLimited) => {
                    return Err(CopyWriterError::RateLimited);
                }
                Err(e) => {
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CopyWriterError::Api("Unknown error".to_string())))
    }
}
