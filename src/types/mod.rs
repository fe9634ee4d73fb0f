//! Core Types
//!
//! Credential pool types and the unified error system.

pub mod credential;
pub mod error;

pub use credential::{AiCredential, CredentialStatus, CredentialTier};
pub use error::{CondoError, FailureKind, Result, ResultExt};
