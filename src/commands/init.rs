use crate::config::{default_config_toml, CONFIG_FILE_NAME};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn init_config(force: bool) -> Result<()> {
    init_config_in(Path::new("."), force)?;
    println!("Created {CONFIG_FILE_NAME} configuration file");
    Ok(())
}

/// Write the default config into `dir`.
pub fn init_config_in(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    fs::write(&config_path, default_config_toml())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    Ok(())
}
