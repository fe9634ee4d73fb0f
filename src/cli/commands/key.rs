//! Key Command
//!
//! Manages the credential pool: add keys, list pool state (secrets
//! redacted), and reactivate a fully demoted pool.

use console::style;
use uuid::Uuid;

use crate::config::ConfigLoader;
use crate::storage::Database;
use crate::types::{AiCredential, CredentialStatus, CredentialTier, Result};

/// Add a credential to the pool.
pub fn add(secret: &str, priority: i64, paid: bool, id: Option<String>) -> Result<()> {
    let config = ConfigLoader::load()?;
    let db = Database::open(&config.storage.db_path)?;

    let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let tier = if paid {
        CredentialTier::Paid
    } else {
        CredentialTier::Free
    };

    let credential = AiCredential::new(&id, secret, priority).with_tier(tier);
    db.insert_credential(&credential)?;

    println!(
        "Added credential {} (priority {}, tier {})",
        style(&id).cyan(),
        priority,
        tier
    );
    Ok(())
}

/// List the pool, secrets redacted.
pub fn list() -> Result<()> {
    let config = ConfigLoader::load()?;
    let db = Database::open(&config.storage.db_path)?;

    let credentials = db.list_credentials()?;
    if credentials.is_empty() {
        println!("Credential pool is empty.");
        return Ok(());
    }

    println!(
        "{:<38} {:>8}  {:<14} {:<5} {:>6}  {}",
        "ID", "PRIORITY", "STATUS", "TIER", "ERRORS", "LAST CHECKED"
    );
    for c in credentials {
        let status = match c.status {
            CredentialStatus::Active => style(c.status.as_str()).green(),
            CredentialStatus::QuotaExceeded => style(c.status.as_str()).yellow(),
            _ => style(c.status.as_str()).red(),
        };
        let last_checked = c
            .last_checked
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<38} {:>8}  {:<14} {:<5} {:>6}  {}",
            c.id, c.priority, status, c.tier, c.error_count, last_checked
        );
    }
    Ok(())
}

/// Reactivate every credential in the pool.
pub fn reset() -> Result<()> {
    let config = ConfigLoader::load()?;
    let db = Database::open(&config.storage.db_path)?;

    let changed = db.reactivate_all()?;
    println!("Reactivated {} credential(s).", changed);
    Ok(())
}
