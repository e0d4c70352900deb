//! Generate command - plan and write copy for every variant

use anyhow::{Context, Result, bail};
use copy_variants_adapters::llm::{
    AnthropicCopyWriter, LlmConfig as AdapterLlmConfig, OpenAiCopyWriter, StubCopyWriter,
    UnconfiguredCopyWriter,
};
use copy_variants_domain::usecases::{
    LlmCopyGenerator, generate_copy_from_plan, generate_from_length_plan,
};
use copy_variants_domain::{CopyWriter, GenerationResult, WriterOptions};
use secrecy::SecretString;
use std::path::PathBuf;

use crate::args::GenerateArgs;
use crate::commands::plan::{AnyPlan, build_plan};
use crate::config::AppConfig;

pub async fn execute(args: GenerateArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref()).context("Failed to load configuration")?;
    let plan = build_plan(&args.plan, &config)?;

    let result = if args.offline {
        tracing::info!(plan_id = %plan.id(), "Generating offline");
        match &plan {
            AnyPlan::Platform(plan) => generate_copy_from_plan(plan),
            AnyPlan::Length(plan) => generate_from_length_plan(plan),
        }
    } else {
        let options = WriterOptions {
            model: args.model.clone(),
            temperature: args.temperature,
        };
        let generator = LlmCopyGenerator::new(build_writer(&config)?);
        match &plan {
            AnyPlan::Platform(plan) => generator.generate_copy_from_plan_llm(plan, options).await,
            AnyPlan::Length(plan) => generator.generate_from_length_plan_llm(plan, options).await,
        }
    };

    if args.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize output")?;
        println!("{}", json);
    } else {
        print_result(&result);
    }

    Ok(())
}

/// Select the configured writer; a missing API key means heuristics only
pub(crate) fn build_writer(config: &AppConfig) -> Result<Box<dyn CopyWriter>> {
    let llm_config = adapter_llm_config(&config.llm);

    match config.llm.provider.as_str() {
        "openai" => match load_api_key(&config.llm.openai.api_key_env) {
            Some(api_key) => Ok(Box::new(
                OpenAiCopyWriter::with_base_url(
                    api_key,
                    config.llm.openai.base_url.clone(),
                    llm_config,
                )
                .context("Failed to configure OpenAI provider")?,
            )),
            None => Ok(unconfigured("openai", &config.llm.openai.api_key_env)),
        },
        "anthropic" => match load_api_key(&config.llm.anthropic.api_key_env) {
            Some(api_key) => Ok(Box::new(
                AnthropicCopyWriter::with_base_url(
                    api_key,
                    config.llm.anthropic.base_url.clone(),
                    llm_config,
                )
                .context("Failed to configure Anthropic provider")?,
            )),
            None => Ok(unconfigured("anthropic", &config.llm.anthropic.api_key_env)),
        },
        "stub" => Ok(Box::new(StubCopyWriter::echo())),
        "none" => Ok(Box::new(UnconfiguredCopyWriter)),
        other => bail!("Unknown LLM provider: {}", other),
    }
}

fn unconfigured(provider: &str, env_var: &str) -> Box<dyn CopyWriter> {
    tracing::debug!(provider = provider, env_var = env_var, "API key not set");
    Box::new(UnconfiguredCopyWriter)
}

fn adapter_llm_config(config: &crate::config::LlmConfig) -> AdapterLlmConfig {
    AdapterLlmConfig {
        model: config.model.clone(),
        temperature: config.temperature,
        max_output_tokens: config.max_output_tokens,
        timeout_secs: config.timeout_secs,
        retries: config.retries,
    }
}

/// Read an API key from the named env var; unset or blank reads as absent
pub(crate) fn load_api_key(env_var: &str) -> Option<SecretString> {
    if env_var.trim().is_empty() {
        return None;
    }

    std::env::var(env_var)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .map(|key| SecretString::new(key.into()))
}

fn print_result(result: &GenerationResult) {
    println!("Plan {}", result.plan_id);
    println!();

    for variant in &result.variants {
        println!(
            "[{}] {} / {} / {} ({}/{} chars)",
            variant.id,
            variant.tone,
            variant.structure,
            variant.cta,
            variant.char_count,
            variant.max_chars
        );
        println!("  {}", variant.text);
        for warning in &variant.warnings {
            println!("  ⚠ {}", warning);
        }
        println!();
    }
}
