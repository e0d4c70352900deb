//! Anthropic Claude API adapter

use async_trait::async_trait;
use copy_variants_domain::{CopyRequest, CopyWriter, CopyWriterError, DraftText};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{LlmConfig, backoff, build_copy_prompt, http_client, parse_copy_response};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

/// Copy writer backed by the Anthropic messages API
pub struct AnthropicCopyWriter {
    client: Client,
    api_key: SecretString,
    base_url: String,
    config: LlmConfig,
}

impl AnthropicCopyWriter {
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

    async fn call_api(&self, request: &AnthropicRequest) -> Result<String, CopyWriterError> {
        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
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

        let api_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| CopyWriterError::InvalidFormat(e.to_string()))?;

        let text = api_response
            .content
            .into_iter()
            .filter_map(|c| {
                if c.r#type == "text" {
                    Some(c.text)
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(CopyWriterError::InvalidFormat("Empty response".to_string()));
        }

        Ok(text)
    }
}

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    r#type: String,
    #[serde(default)]
    text: String,
}

#[async_trait]
impl CopyWriter for AnthropicCopyWriter {
    async fn write(&self, request: CopyRequest) -> Result<Vec<DraftText>, CopyWriterError> {
        let prompt = build_copy_prompt(&request);
        let (model, temperature) = self.config.resolve(&request);
        let body = AnthropicRequest {
            model,
            max_tokens: self.config.max_output_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.user,
            }],
            system: Some(prompt.system),
            temperature: Some(temperature),
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
