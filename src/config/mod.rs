//! Configuration
//!
//! Layered settings: built-in defaults, `condokit.toml`, then `CONDOKIT_*`
//! environment variables.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    Config, FailoverSettings, GenerationSettings, ProviderSettings, StorageSettings,
};
