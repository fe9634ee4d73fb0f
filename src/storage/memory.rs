//! In-Memory Credential Store
//!
//! A `Mutex<Vec<_>>`-backed [`CredentialRepository`] for tests and embedders
//! that don't want a database file. Selection semantics match the SQLite
//! implementation: lowest priority among ACTIVE rows, ties broken by id.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{CredentialOutcome, CredentialRepository};
use crate::types::{AiCredential, CondoError, Result};

/// In-memory credential pool.
#[derive(Default)]
pub struct MemoryCredentialStore {
    credentials: Mutex<Vec<AiCredential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-seeded with credentials.
    pub fn with_credentials(credentials: Vec<AiCredential>) -> Self {
        Self {
            credentials: Mutex::new(credentials),
        }
    }

    /// Add a credential to the pool.
    pub fn insert(&self, credential: AiCredential) {
        let mut pool = self.credentials.lock().unwrap_or_else(|e| e.into_inner());
        pool.push(credential);
    }

    /// Snapshot of the current pool state.
    pub fn snapshot(&self) -> Vec<AiCredential> {
        let pool = self.credentials.lock().unwrap_or_else(|e| e.into_inner());
        pool.clone()
    }
}

#[async_trait]
impl CredentialRepository for MemoryCredentialStore {
    async fn find_best_active(&self) -> Result<Option<AiCredential>> {
        let pool = self.credentials.lock().unwrap_or_else(|e| e.into_inner());
        let best = pool
            .iter()
            .filter(|c| c.status == crate::types::CredentialStatus::Active)
            .min_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.id.cmp(&b.id)))
            .cloned();
        Ok(best)
    }

    async fn record_outcome(&self, id: &str, outcome: &CredentialOutcome) -> Result<()> {
        let mut pool = self.credentials.lock().unwrap_or_else(|e| e.into_inner());
        let credential = pool.iter_mut().find(|c| c.id == id).ok_or_else(|| {
            CondoError::Storage(format!("cannot record outcome: credential '{}' not found", id))
        })?;

        credential.status = outcome.status;
        credential.error_count = outcome.error_count;
        credential.last_checked = Some(outcome.last_checked);
        Ok(())
    }
}
