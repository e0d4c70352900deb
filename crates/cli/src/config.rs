//! Configuration loading and management

use anyhow::{Context, Result};
use copy_variants_domain::Brand;
use copy_variants_domain::usecases::{DEFAULT_LENGTH_VARIANTS, DEFAULT_PLATFORM_VARIANTS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub brand: BrandConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Seed used when `--seed` is not given
    #[serde(default)]
    pub default_seed: Option<u32>,

    #[serde(default = "default_platform_variants")]
    pub platform_variants: usize,

    #[serde(default = "default_length_variants")]
    pub length_variants: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_llm_retries")]
    pub retries: u32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub anthropic: AnthropicConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_openai_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    #[serde(default = "default_anthropic_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_anthropic_base_url")]
    pub base_url: String,
}

/// Brand defaults merged with `--voice` and `--forbidden`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandConfig {
    #[serde(default)]
    pub voice: Option<String>,

    #[serde(default)]
    pub forbidden: Vec<String>,

    #[serde(default)]
    pub notes: Vec<String>,
}

// Default value functions
fn default_platform_variants() -> usize {
    DEFAULT_PLATFORM_VARIANTS
}

fn default_length_variants() -> usize {
    DEFAULT_LENGTH_VARIANTS
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_timeout() -> u64 {
    60
}

fn default_llm_retries() -> u32 {
    1
}

fn default_max_output_tokens() -> u32 {
    4000
}

fn default_openai_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_anthropic_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com/v1".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_seed: None,
            platform_variants: default_platform_variants(),
            length_variants: default_length_variants(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout(),
            retries: default_llm_retries(),
            max_output_tokens: default_max_output_tokens(),
            openai: OpenAiConfig::default(),
            anthropic: AnthropicConfig::default(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_openai_api_key_env(),
            base_url: default_openai_base_url(),
        }
    }
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_anthropic_api_key_env(),
            base_url: default_anthropic_base_url(),
        }
    }
}

impl BrandConfig {
    /// Merge configured brand rules with command-line additions
    pub fn merged(&self, voice: Option<&str>, forbidden: &[String]) -> Option<Brand> {
        let mut all_forbidden = self.forbidden.clone();
        for phrase in forbidden {
            if !all_forbidden.iter().any(|p| p.eq_ignore_ascii_case(phrase)) {
                all_forbidden.push(phrase.clone());
            }
        }

        let brand = Brand {
            voice: voice.map(str::to_string).or_else(|| self.voice.clone()),
            forbidden: all_forbidden,
            notes: self.notes.clone(),
        };

        if brand == Brand::default() {
            None
        } else {
            Some(brand)
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("COPY_VARIANTS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# copy-variants configuration

[general]
# default_seed = 42
platform_variants = 10
length_variants = 40

[llm]
provider = "openai"  # openai, anthropic, stub, none
model = "gpt-4o-mini"
temperature = 0.7
timeout_secs = 60
retries = 1
max_output_tokens = 4000

[llm.openai]
api_key_env = "OPENAI_API_KEY"
base_url = "https://api.openai.com/v1"

[llm.anthropic]
api_key_env = "ANTHROPIC_API_KEY"
base_url = "https://api.anthropic.com/v1"

[brand]
# voice = "confident, plain-spoken"
forbidden = []
notes = []
"#
        .to_string()
    }
}
