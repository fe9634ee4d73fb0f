//! Config Command
//!
//! Inspect and initialize the merged configuration.

use crate::config::ConfigLoader;
use crate::types::{CondoError, Result};

/// Show the effective configuration (merged from all sources).
pub fn show(as_json: bool) -> Result<()> {
    let config = ConfigLoader::load()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!(
            "{}",
            toml::to_string_pretty(&config).map_err(|e| CondoError::Config(e.to_string()))?
        );
    }
    Ok(())
}

/// Show the config file path and whether it exists.
pub fn path() -> Result<()> {
    let path = ConfigLoader::config_path();
    let exists = if path.exists() { "✓" } else { "✗" };
    println!("{} {}", exists, path.display());
    Ok(())
}

/// Write a default config file.
pub fn init(force: bool) -> Result<()> {
    let path = ConfigLoader::init(force)?;
    println!("Created config: {}", path.display());
    Ok(())
}
