//! LLM copy-writer adapters

pub mod anthropic;
pub mod openai;
pub mod stub;
pub mod unconfigured;

pub use anthropic::AnthropicCopyWriter;
pub use openai::OpenAiCopyWriter;
pub use stub::StubCopyWriter;
pub use unconfigured::UnconfiguredCopyWriter;

use copy_variants_domain::{CopyRequest, CopyWriterError, DraftText, policy::ConstraintPolicy};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Common LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name/ID
    pub model: String,
    /// Temperature (0.0-1.0)
    pub temperature: f64,
    /// Maximum output tokens
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries on failure
    pub retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_output_tokens: 4000,
            timeout_secs: 60,
            retries: 1,
        }
    }
}

impl LlmConfig {
    /// Model and temperature for one request, honoring per-call overrides
    pub fn resolve(&self, request: &CopyRequest) -> (String, f64) {
        let model = request
            .options
            .model
            .clone()
            .unwrap_or_else(|| self.model.clone());
        let temperature = request.options.temperature.unwrap_or(self.temperature);
        (model, temperature)
    }
}

pub(crate) fn http_client(config: &LlmConfig) -> Result<Client, CopyWriterError> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| CopyWriterError::Api(format!("Failed to build HTTP client: {}", e)))
}

pub(crate) fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(500 * 2_u64.pow(attempt))
}

/// System and user messages for a copy request
#[derive(Debug, Clone)]
pub struct CopyPrompt {
    pub system: String,
    pub user: String,
}

/// Build the prompt: hard rules in the system message, the plan as JSON in the user message
pub fn build_copy_prompt(request: &CopyRequest) -> CopyPrompt {
    let mut system = String::new();
    system.push_str("You are a senior marketing copywriter. Write one piece of copy per variant.\n\n");
    system.push_str(&ConstraintPolicy::prompt_rules(request.brand.as_ref()));
    system.push_str("\n\nReturn one object per variant, keeping every id. No markdown, no commentary.");

    let payload = serde_json::json!({
        "idea": request.idea,
        "brand": request.brand,
        "variants": request.variants,
    });

    CopyPrompt {
        system,
        user: payload.to_string(),
    }
}

/// Parse the model response into variant texts
pub fn parse_copy_response(response: &str) -> Result<Vec<DraftText>, String> {
    let json_str = extract_json_array(response)
        .ok_or_else(|| "No JSON array found in response".to_string())?;

    serde_json::from_str(json_str).map_err(|e| format!("Failed to parse JSON: {}", e))
}

/// Locate the first complete JSON array literal, skipping any surrounding prose
fn extract_json_array(response: &str) -> Option<&str> {
    let start = response.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in response[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&response[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}
