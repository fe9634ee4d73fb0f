//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Config file (`condokit.toml` in the working directory)
//! 3. Environment variables (CONDOKIT_* prefix)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::Config;
use crate::types::{CondoError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with the full resolution chain:
    /// defaults → config file → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let config_path = Self::config_path();
        if config_path.exists() {
            debug!("Loading config from: {}", config_path.display());
            figment = figment.merge(Toml::file(&config_path));
        }

        // Double underscore separates sections from keys that themselves
        // contain underscores: CONDOKIT_FAILOVER__MAX_ATTEMPTS -> failover.max_attempts
        figment = figment.merge(Env::prefixed("CONDOKIT_").split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| CondoError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| CondoError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Path to the config file in the working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("condokit.toml")
    }

    /// Write a default config file, refusing to clobber unless forced.
    pub fn init(force: bool) -> Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() && !force {
            return Err(CondoError::Config(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }
        fs::write(&path, Self::default_config_toml())?;
        Ok(path)
    }

    /// Default config file content (TOML).
    fn default_config_toml() -> String {
        r#"# condokit configuration
# Environment variables with the CONDOKIT_ prefix override these values,
# e.g. CONDOKIT_FAILOVER__MAX_ATTEMPTS=3.
# The environment fallback key is read from GEMINI_API_KEY.

version = "1.0"

[provider]
api_base = "https://generativelanguage.googleapis.com/v1beta"
timeout_secs = 60

[failover]
max_attempts = 2

[storage]
db_path = "condokit.db"

[generation]
# temperature = 0.7
# top_p = 0.95
# top_k = 40
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::load_from_file(&dir.path().join("none.toml")).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.failover.max_attempts, 2);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("condokit.toml");
        fs::write(
            &path,
            r#"
[failover]
max_attempts = 5

[storage]
db_path = "/tmp/pool.db"
"#,
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.failover.max_attempts, 5);
        assert_eq!(config.storage.db_path, "/tmp/pool.db");
        // Untouched sections keep defaults
        assert_eq!(config.provider.timeout_secs, 60);
    }

    #[test]
    fn test_load_from_file_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("condokit.toml");
        fs::write(&path, "[failover]\nmax_attempts = 0\n").unwrap();

        assert!(ConfigLoader::load_from_file(&path).is_err());
    }

    #[test]
    fn test_default_config_toml_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("condokit.toml");
        fs::write(&path, ConfigLoader::default_config_toml()).unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert!(config.validate().is_ok());
    }
}
