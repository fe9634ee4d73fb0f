//! Credential Store
//!
//! The failover executor talks to the pool through the
//! [`CredentialRepository`] trait, so production code uses the SQLite-backed
//! [`Database`] while tests inject [`MemoryCredentialStore`].

pub mod database;
pub mod memory;

pub use database::{Database, PoolConfig, SharedDatabase};
pub use memory::MemoryCredentialStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::types::{AiCredential, CredentialStatus, Result};

/// Outcome of one provider call, persisted against the credential that
/// made it.
#[derive(Debug, Clone)]
pub struct CredentialOutcome {
    pub status: CredentialStatus,
    pub error_count: u32,
    pub last_checked: DateTime<Utc>,
}

impl CredentialOutcome {
    /// A successful call: the credential stays active and its error count
    /// resets to zero.
    pub fn success(at: DateTime<Utc>) -> Self {
        Self {
            status: CredentialStatus::Active,
            error_count: 0,
            last_checked: at,
        }
    }

    /// A failed call: the credential transitions to the classified status
    /// with its incremented error count.
    pub fn failure(status: CredentialStatus, error_count: u32, at: DateTime<Utc>) -> Self {
        Self {
            status,
            error_count,
            last_checked: at,
        }
    }
}

/// Read/write access to the credential pool.
///
/// Two query shapes are all the executor needs: "best active by priority"
/// and "record outcome by id".
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// The ACTIVE credential with the lowest priority value, or `None` when
    /// the pool has no active rows. Ties break on id for determinism.
    async fn find_best_active(&self) -> Result<Option<AiCredential>>;

    /// Persist a call outcome against a credential.
    async fn record_outcome(&self, id: &str, outcome: &CredentialOutcome) -> Result<()>;
}
