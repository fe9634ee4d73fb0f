//! Unified Error Type System
//!
//! Centralized error types for the entire application, plus the failure
//! classifier that drives credential demotion in the failover executor.
//!
//! ## Design Principles
//!
//! - Single unified error type (CondoError) for the entire application
//! - Provider failures carry the raw upstream message so classification can
//!   inspect it
//! - Taxpayer-ID validation failures are booleans, never errors
//! - No panic/unwrap - all errors are recoverable

use thiserror::Error;

use crate::types::credential::CredentialStatus;

// =============================================================================
// Failure Classification
// =============================================================================

/// Classification of a provider failure, used to decide which status a
/// credential is demoted to before the next candidate is tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Rate limit or quota exhaustion on the upstream API
    QuotaExceeded,
    /// The key itself was rejected - do not reuse until rotated
    InvalidKey,
    /// Anything else: network faults, 5xx, malformed responses
    Generic,
}

impl FailureKind {
    /// Classify a provider error message.
    ///
    /// Matching is case-insensitive over the raw upstream text: quota and 429
    /// markers demote to [`CredentialStatus::QuotaExceeded`], rejected-key
    /// markers to [`CredentialStatus::Invalid`], everything else to the
    /// generic error status.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();

        if lower.contains("429") || lower.contains("quota") {
            return Self::QuotaExceeded;
        }

        if lower.contains("api key not valid")
            || lower.contains("api_key_invalid")
            || lower.contains("401")
        {
            return Self::InvalidKey;
        }

        Self::Generic
    }

    /// The credential status a failing credential transitions to.
    pub fn demoted_status(&self) -> CredentialStatus {
        match self {
            Self::QuotaExceeded => CredentialStatus::QuotaExceeded,
            Self::InvalidKey => CredentialStatus::Invalid,
            Self::Generic => CredentialStatus::Error,
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded => write!(f, "QUOTA_EXCEEDED"),
            Self::InvalidKey => write!(f, "INVALID_KEY"),
            Self::Generic => write!(f, "ERROR"),
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum CondoError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    /// Upstream generative-AI call failed; message is the raw provider text
    #[error("Provider error: {message}")]
    Provider { message: String },

    /// No ACTIVE credential in the pool and no environment fallback configured
    #[error("no operational credential: pool is empty and no fallback key is configured")]
    NoCredential,

    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl CondoError {
    /// Create a provider error from an upstream message.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Classify this error for credential demotion.
    ///
    /// Only provider errors carry a classifiable upstream message; anything
    /// else demotes generically.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Provider { message } => FailureKind::classify(message),
            _ => FailureKind::Generic,
        }
    }
}

pub type Result<T> = std::result::Result<T, CondoError>;

/// Context extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> Result<T>;

    /// Add context using a closure (lazy evaluation)
    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| CondoError::Storage(format!("{}: {}", context.into(), e)))
    }

    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| CondoError::Storage(format!("{}: {}", f().into(), e)))
    }
}

// =============================================================================
// Tests
// =============================================================================
