//! Credential Pool Types
//!
//! An [`AiCredential`] is one API key in the rotation pool. The failover
//! executor only ever transitions a credential's status; rows are never
//! deleted by this logic. Statuses and tiers are closed enums so invalid
//! states cannot be represented.

use chrono::{DateTime, Utc};
use secrecy::SecretString;

use crate::types::error::{CondoError, Result};

/// Gate for credential selection. Only `Active` credentials are candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStatus {
    /// Eligible for selection
    Active,
    /// Demoted after a generic provider failure
    Error,
    /// Demoted after a 429/quota failure
    QuotaExceeded,
    /// Demoted after the provider rejected the key itself
    Invalid,
}

impl CredentialStatus {
    /// Stable text encoding used in the credential table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Error => "ERROR",
            Self::QuotaExceeded => "QUOTA_EXCEEDED",
            Self::Invalid => "INVALID",
        }
    }

    /// Parse the stored text encoding.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "ERROR" => Ok(Self::Error),
            "QUOTA_EXCEEDED" => Ok(Self::QuotaExceeded),
            "INVALID" => Ok(Self::Invalid),
            other => Err(CondoError::Storage(format!(
                "unknown credential status: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Billing tier of a credential. Drives the default model choice: paid keys
/// get the higher-capability model, free keys the lighter one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialTier {
    #[default]
    Free,
    Paid,
}

impl CredentialTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Paid => "paid",
        }
    }

    /// Parse the stored text encoding. Unknown values fall back to `Free` so
    /// a hand-edited table never blocks selection.
    pub fn parse(s: &str) -> Self {
        match s {
            "paid" => Self::Paid,
            _ => Self::Free,
        }
    }
}

impl std::fmt::Display for CredentialTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One API key in the rotation pool.
///
/// The secret is held as a [`SecretString`] so it never leaks through Debug
/// output or logs.
#[derive(Clone)]
pub struct AiCredential {
    /// Stable identifier (primary key in the store)
    pub id: String,
    /// The API key itself
    pub secret: SecretString,
    /// Selection priority, lower = preferred
    pub priority: i64,
    pub status: CredentialStatus,
    pub tier: CredentialTier,
    /// Consecutive failures since the last success
    pub error_count: u32,
    /// When the executor last recorded an outcome for this credential
    pub last_checked: Option<DateTime<Utc>>,
}

impl AiCredential {
    /// Create an active credential with default tier and no history.
    pub fn new(id: impl Into<String>, secret: impl Into<String>, priority: i64) -> Self {
        Self {
            id: id.into(),
            secret: SecretString::from(secret.into()),
            priority,
            status: CredentialStatus::Active,
            tier: CredentialTier::Free,
            error_count: 0,
            last_checked: None,
        }
    }

    pub fn with_tier(mut self, tier: CredentialTier) -> Self {
        self.tier = tier;
        self
    }
}

impl std::fmt::Debug for AiCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiCredential")
            .field("id", &self.id)
            .field("secret", &"[REDACTED]")
            .field("priority", &self.priority)
            .field("status", &self.status)
            .field("tier", &self.tier)
            .field("error_count", &self.error_count)
            .field("last_checked", &self.last_checked)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            CredentialStatus::Active,
            CredentialStatus::Error,
            CredentialStatus::QuotaExceeded,
            CredentialStatus::Invalid,
        ] {
            assert_eq!(CredentialStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        assert!(CredentialStatus::parse("DISABLED").is_err());
        assert!(CredentialStatus::parse("active").is_err());
    }

    #[test]
    fn test_tier_parse_defaults_to_free() {
        assert_eq!(CredentialTier::parse("paid"), CredentialTier::Paid);
        assert_eq!(CredentialTier::parse("free"), CredentialTier::Free);
        assert_eq!(CredentialTier::parse("enterprise"), CredentialTier::Free);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let cred = AiCredential::new("key-1", "sk-very-secret", 1);
        let debug = format!("{:?}", cred);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-very-secret"));
    }
}
