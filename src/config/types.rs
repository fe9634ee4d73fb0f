//! Configuration Types
//!
//! Serde-backed settings merged by the figment loader. The fallback API key
//! deliberately never serializes back out.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::ai::{FailoverConfig, ProviderConfig};
use crate::constants::{network, storage};
use crate::types::{CondoError, Result};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: String,
    pub provider: ProviderSettings,
    pub failover: FailoverSettings,
    pub storage: StorageSettings,
    pub generation: GenerationSettings,
    /// Environment fallback key, used only when the credential pool has no
    /// ACTIVE row. Also sourced from `GEMINI_API_KEY`. Never serialized.
    #[serde(skip_serializing)]
    pub fallback_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            provider: ProviderSettings::default(),
            failover: FailoverSettings::default(),
            storage: StorageSettings::default(),
            generation: GenerationSettings::default(),
            fallback_api_key: None,
        }
    }
}

impl Config {
    /// Validate ranges after loading.
    pub fn validate(&self) -> Result<()> {
        if self.failover.max_attempts == 0 {
            return Err(CondoError::Config(
                "failover.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.provider.timeout_secs == 0 {
            return Err(CondoError::Config(
                "provider.timeout_secs must be positive".to_string(),
            ));
        }
        if let Some(t) = self.generation.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(CondoError::Config(format!(
                    "generation.temperature must be within 0.0..=2.0, got {}",
                    t
                )));
            }
        }
        Ok(())
    }

    /// Resolve the environment fallback credential: config value first, then
    /// the `GEMINI_API_KEY` environment variable.
    pub fn fallback_key(&self) -> Option<SecretString> {
        self.fallback_api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .filter(|k| !k.is_empty())
            .map(SecretString::from)
    }

    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            api_base: self.provider.api_base.clone(),
            timeout_secs: self.provider.timeout_secs,
        }
    }

    pub fn failover_config(&self) -> FailoverConfig {
        FailoverConfig {
            max_attempts: self.failover.max_attempts,
        }
    }
}

/// HTTP provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_base: network::DEFAULT_API_BASE.to_string(),
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Failover executor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FailoverSettings {
    /// Maximum distinct candidates tried per call
    pub max_attempts: usize,
}

impl Default for FailoverSettings {
    fn default() -> Self {
        Self {
            max_attempts: crate::constants::failover::MAX_ATTEMPTS,
        }
    }
}

/// Credential store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Path to the SQLite credential database
    pub db_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            db_path: storage::DEFAULT_DB_PATH.to_string(),
        }
    }
}

/// Default generation parameters applied to requests that don't set their
/// own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
}
