use anyhow::Result;
use loghive_runtime::Config;
use std::path::Path;

pub fn handle(workspace: &Path, refresh: bool) -> Result<()> {
    let config_path = workspace.join("config.toml");

    if config_path.exists() && !refresh {
        println!(
            "Config already exists: {} (use --refresh to redetect)",
            config_path.display()
        );
        return Ok(());
    }

    let config = Config::detect_providers();
    config.save_to(&config_path)?;

    if config.providers.is_empty() {
        println!(
            "No assistant log directories found; wrote an empty config to {}",
            config_path.display()
        );
        return Ok(());
    }

    println!("Detected {} provider(s):", config.providers.len());
    for (name, settings) in &config.providers {
        println!("  {:<12} {}", name, settings.log_root.display());
    }
    println!("Wrote {}", config_path.display());
    Ok(())
}
