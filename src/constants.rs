//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Failover executor constants
pub mod failover {
    /// Maximum live attempts per logical call: the original selection plus
    /// one retry with the next candidate after a demotion
    pub const MAX_ATTEMPTS: usize = 2;

    /// Default model for paid-tier credentials
    pub const PAID_TIER_MODEL: &str = "gemini-2.5-pro";

    /// Default model for free-tier credentials and the environment fallback
    pub const FREE_TIER_MODEL: &str = "gemini-2.5-flash";

    /// Credential id reported in logs when the environment fallback is used
    pub const FALLBACK_CREDENTIAL_ID: &str = "env-fallback";
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Default Generative Language API base URL
    pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
}

/// Storage constants
pub mod storage {
    /// Default credential database filename
    pub const DEFAULT_DB_PATH: &str = "condokit.db";
}
