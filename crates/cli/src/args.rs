//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use copy_variants_domain::PlatformKey;
use std::path::PathBuf;

/// copy-variants: plan and generate seeded marketing copy variants
#[derive(Parser, Debug)]
#[command(name = "copy-variants")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a reproducible variant plan and print it as JSON
    Plan(PlanArgs),

    /// Plan and write copy for every variant
    Generate(GenerateArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Validate configuration and show status
    Doctor(DoctorArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// The product idea to write about
    #[arg(long)]
    pub idea: String,

    /// Target platform (repeatable; defaults to every platform)
    #[arg(long = "platform", conflicts_with = "max_chars")]
    pub platforms: Vec<PlatformKey>,

    /// Plan for a single character budget instead of platforms
    #[arg(long)]
    pub max_chars: Option<usize>,

    /// Seed for the planner
    #[arg(long)]
    pub seed: Option<u32>,

    /// Number of variants to plan
    #[arg(long)]
    pub count: Option<usize>,

    /// Phrase the brand must avoid (repeatable)
    #[arg(long)]
    pub forbidden: Vec<String>,

    /// Brand voice description
    #[arg(long)]
    pub voice: Option<String>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    /// Skip the model and use heuristics only
    #[arg(long)]
    pub offline: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Override the configured model
    #[arg(long)]
    pub model: Option<String>,

    /// Override the configured temperature
    #[arg(long)]
    pub temperature: Option<f64>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./config.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
