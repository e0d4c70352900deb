//! Plan command - print a reproducible variant plan

use anyhow::{Context, Result, bail};
use copy_variants_domain::usecases::{
    LengthPlanRequest, PlanRequest, plan_copy_variants, plan_copy_variants_by_length,
};
use copy_variants_domain::{LengthPlan, Plan};
use serde::Serialize;
use std::path::PathBuf;

use crate::args::PlanArgs;
use crate::config::AppConfig;

/// Either kind of plan, as selected by `--max-chars`
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum AnyPlan {
    Platform(Plan),
    Length(LengthPlan),
}

impl AnyPlan {
    pub(crate) fn id(&self) -> &str {
        match self {
            AnyPlan::Platform(plan) => &plan.id,
            AnyPlan::Length(plan) => &plan.id,
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            AnyPlan::Platform(plan) => plan.variants.len(),
            AnyPlan::Length(plan) => plan.variants.len(),
        }
    }
}

pub async fn execute(args: PlanArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref()).context("Failed to load configuration")?;
    let plan = build_plan(&args, &config)?;

    let json = serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?;
    println!("{}", json);

    Ok(())
}

/// Validate arguments and run the matching planner
pub(crate) fn build_plan(args: &PlanArgs, config: &AppConfig) -> Result<AnyPlan> {
    let idea = args.idea.trim();
    if idea.is_empty() {
        bail!("No idea provided");
    }
    if args.count == Some(0) {
        bail!("--count must be at least 1");
    }

    let brand = config
        .brand
        .merged(args.voice.as_deref(), &args.forbidden);
    let seed = args.seed.or(config.general.default_seed);

    let plan = match args.max_chars {
        Some(0) => bail!("--max-chars must be at least 1"),
        Some(max_chars) => AnyPlan::Length(plan_copy_variants_by_length(LengthPlanRequest {
            idea: idea.to_string(),
            brand,
            max_chars,
            seed,
            total_variants: Some(args.count.unwrap_or(config.general.length_variants)),
        })),
        None => AnyPlan::Platform(plan_copy_variants(PlanRequest {
            idea: idea.to_string(),
            brand,
            platforms: (!args.platforms.is_empty()).then(|| args.platforms.clone()),
            seed,
            total_variants: Some(args.count.unwrap_or(config.general.platform_variants)),
        })),
    };

    tracing::info!(plan_id = %plan.id(), variants = plan.len(), "Planned variants");

    Ok(plan)
}
