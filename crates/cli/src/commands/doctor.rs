//! Doctor command - validate configuration and show status

use anyhow::Result;
use copy_variants_domain::platforms::all_platforms;
use serde::Serialize;
use std::path::PathBuf;

use crate::args::DoctorArgs;
use crate::commands::generate::load_api_key;
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    llm: CheckResult,
    brand: CheckResult,
    platforms: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
    details: Option<serde_json::Value>,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        llm: CheckResult::error("Not checked"),
        brand: CheckResult::error("Not checked"),
        platforms: check_platforms(),
        overall: "error".to_string(),
    };

    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(c) => {
            report.config = CheckResult::ok("Configuration loaded successfully");
            Some(c)
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {:#}", e));
            None
        }
    };

    if let Some(ref config) = config {
        report.llm = check_llm(config);
        report.brand = check_brand(config);
    }

    let checks = [&report.config, &report.llm, &report.brand, &report.platforms];

    report.overall = if checks.iter().any(|c| c.is_error()) {
        "error".to_string()
    } else if checks.iter().all(|c| c.is_ok()) {
        "ok".to_string()
    } else {
        "warn".to_string()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == "error" {
        std::process::exit(1);
    }

    Ok(())
}

fn check_llm(config: &AppConfig) -> CheckResult {
    let provider = &config.llm.provider;
    let model = &config.llm.model;

    let api_key_env = match provider.as_str() {
        "openai" => &config.llm.openai.api_key_env,
        "anthropic" => &config.llm.anthropic.api_key_env,
        "stub" => return CheckResult::ok("Provider: stub (offline)"),
        "none" => return CheckResult::ok("Provider: none (heuristics only)"),
        other => return CheckResult::error(format!("Unknown provider: {}", other)),
    };

    if api_key_env.trim().is_empty() {
        return CheckResult::warn(format!(
            "No API key env var configured for {}; heuristics will be used",
            provider
        ));
    }

    // Report presence only, never the value
    match load_api_key(api_key_env) {
        Some(_) => CheckResult::ok(format!(
            "Provider: {}, Model: {}, API key: {} (set)",
            provider, model, api_key_env
        )),
        None => CheckResult::warn(format!(
            "Provider: {}, Model: {}, API key: {} (not set, heuristics will be used)",
            provider, model, api_key_env
        )),
    }
}

fn check_brand(config: &AppConfig) -> CheckResult {
    let brand = &config.brand;
    let blank = brand.forbidden.iter().filter(|p| p.trim().is_empty()).count();
    if blank > 0 {
        return CheckResult::warn(format!("{} blank forbidden phrase(s) will be ignored", blank));
    }

    CheckResult::ok(format!(
        "Voice: {}, Forbidden phrases: {}, Notes: {}",
        brand.voice.as_deref().unwrap_or("(none)"),
        brand.forbidden.len(),
        brand.notes.len()
    ))
    .with_details(serde_json::json!({ "forbidden": brand.forbidden }))
}

fn check_platforms() -> CheckResult {
    let platforms = all_platforms();
    CheckResult::ok(format!("{} platforms available", platforms.len())).with_details(
        serde_json::json!(
            platforms
                .iter()
                .map(|p| p.spec())
                .map(|spec| serde_json::json!({ "key": spec.key, "maxChars": spec.max_chars }))
                .collect::<Vec<_>>()
        ),
    )
}

fn print_report(report: &DoctorReport) {
    println!("copy-variants Doctor Report");
    println!("===========================");
    println!();

    print_check("Config", &report.config);
    print_check("LLM Provider", &report.llm);
    print_check("Brand", &report.brand);
    print_check("Platforms", &report.platforms);

    println!();
    let symbol = match report.overall.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} Overall: {}", symbol, report.overall.to_uppercase());
}

fn print_check(name: &str, result: &CheckResult) {
    let symbol = match result.status.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} {}: {}", symbol, name, result.message);
}
