//! Config command - configuration management

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::args::{ConfigArgs, ConfigCommands};
use crate::config::AppConfig;

pub async fn execute(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init { path, force } => {
            write_example(&path, force)?;

            println!("Created config file: {}", path.display());
            println!();
            println!("Next steps:");
            println!("  1. Pick a provider and export its API key env var");
            println!("  2. Add brand voice and forbidden phrases under [brand]");
            println!("  3. Run 'copy-variants doctor' to validate your setup");
            println!("  4. Run 'copy-variants generate --idea \"...\" --offline' to test");
            Ok(())
        }
    }
}

/// Write the example config, refusing to clobber an existing file unless forced
fn write_example(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, AppConfig::example_toml())
        .with_context(|| format!("Failed to write config file: {}", path.display()))
}
