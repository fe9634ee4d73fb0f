//! condokit - Taxpayer-ID Validation and AI Credential Failover
//!
//! Service core extracted from a community-association management platform:
//! the pieces with actual algorithmic content, packaged as a reusable crate.
//!
//! ## Core Features
//!
//! - **Document Validation**: CPF and CNPJ modulo-11 checksum validators,
//!   pure and panic-free
//! - **Credential Failover**: a bounded executor that rotates prioritized
//!   API keys, demoting failed ones by error class (quota, invalid key,
//!   generic)
//! - **Credential Store**: pooled SQLite persistence behind a repository
//!   trait, with an in-memory implementation for tests
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use condokit::{Database, FailoverExecutor, GeminiProvider, GenerationRequest};
//! use condokit::ai::ProviderConfig;
//!
//! let db = Arc::new(Database::open("condokit.db")?);
//! let provider = Arc::new(GeminiProvider::new(&ProviderConfig::default())?);
//! let executor = FailoverExecutor::new(db, provider);
//! let text = executor.execute(&GenerationRequest::new("hello")).await?;
//! ```
//!
//! ## Modules
//!
//! - [`document`]: CPF/CNPJ normalization, checksum validation, formatting
//! - [`ai`]: generative provider abstraction and the failover executor
//! - [`storage`]: SQLite credential store with connection pooling
//! - [`config`]: layered configuration

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod document;
pub mod storage;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{CondoError, FailureKind, Result, ResultExt};

// Credentials
pub use types::{AiCredential, CredentialStatus, CredentialTier};

// Storage
pub use storage::database::PoolConfig;
pub use storage::{CredentialOutcome, CredentialRepository, Database, MemoryCredentialStore};

// AI
pub use ai::{
    FailoverConfig, FailoverExecutor, GeminiProvider, GenerationRequest, GenerativeProvider,
    SharedProvider,
};
