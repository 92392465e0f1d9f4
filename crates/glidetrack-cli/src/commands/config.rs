use std::path::Path;

use anyhow::{bail, Result};
use tracing::info;

use glidetrack_core::AppConfig;

pub fn show(config: &AppConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

pub fn path(config_path: &Path) -> Result<()> {
    println!("{}", config_path.display());
    Ok(())
}

/// Write the default configuration, refusing to clobber an existing file
pub fn init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Config file already exists at {}\nUse --force to overwrite it.",
            config_path.display()
        );
    }
    AppConfig::default().save_to(config_path)?;
    info!(path = %config_path.display(), "Wrote default config");
    println!("Created {}", config_path.display());
    Ok(())
}
