//! Database Layer with Connection Pooling
//!
//! SQLite-backed credential store featuring:
//! - Connection pooling via r2d2 for concurrent access
//! - WAL mode with busy timeout for write contention
//! - Version-tracked schema with `user_version`
//!
//! Concurrent callers may race on credential selection (two requests can pick
//! the same ACTIVE row before either records an outcome). That race is
//! accepted: the worst case is one extra provider call against an
//! already-demoted key.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OptionalExtension, Row, params};
use secrecy::{ExposeSecret, SecretString};

use super::{CredentialOutcome, CredentialRepository};
use crate::types::{AiCredential, CondoError, CredentialStatus, CredentialTier, Result, ResultExt};

/// Shared database handle for async contexts.
pub type SharedDatabase = Arc<Database>;

const SCHEMA: &str = include_str!("schema.sql");

/// Current schema version for migration tracking
const SCHEMA_VERSION: u32 = 1;

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool
    pub max_size: u32,
    /// Minimum idle connections to keep ready
    pub min_idle: u32,
    /// Timeout for acquiring a connection (seconds)
    pub connection_timeout_secs: u64,
}

impl PoolConfig {
    const MIN_POOL_SIZE: u32 = 2;
    const MAX_POOL_SIZE: u32 = 16;

    /// Calculate pool size from available CPU cores, clamped to sane bounds.
    pub fn optimal_pool_size() -> u32 {
        let cores = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);

        cores.clamp(Self::MIN_POOL_SIZE, Self::MAX_POOL_SIZE)
    }

    /// Create config with automatic pool sizing.
    pub fn auto() -> Self {
        let max_size = Self::optimal_pool_size();
        Self {
            max_size,
            min_idle: (max_size / 4).max(1),
            connection_timeout_secs: 30,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::auto()
    }
}

/// Thread-safe credential store with connection pooling.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open database with connection pooling at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, PoolConfig::default())
    }

    /// Open database with custom pool configuration.
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: PoolConfig) -> Result<Self> {
        let manager =
            SqliteConnectionManager::file(path.as_ref()).with_init(Self::configure_connection);

        let pool = Pool::builder()
            .max_size(config.max_size)
            .min_idle(Some(config.min_idle))
            .connection_timeout(std::time::Duration::from_secs(
                config.connection_timeout_secs,
            ))
            .build(manager)
            .map_err(|e| CondoError::Storage(format!("Failed to create connection pool: {}", e)))?;

        let db = Self { pool };
        db.initialize()?;
        Ok(db)
    }

    /// Open an in-memory database for testing or temporary use.
    pub fn open_in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory().with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| CondoError::Storage(format!("Failed to create in-memory pool: {}", e)))?;

        let db = Self { pool };
        db.initialize()?;
        Ok(db)
    }

    /// Configure a new connection with production-ready settings.
    fn configure_connection(conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 5000;
            "#,
        )?;
        Ok(())
    }

    /// Get a connection from the pool.
    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| {
            CondoError::Storage(format!("Failed to acquire database connection: {}", e))
        })
    }

    /// Initialize database schema.
    fn initialize(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA)
            .with_context("Failed to initialize database schema")?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .with_context("Failed to set schema version")?;
        Ok(())
    }

    // =========================================================================
    // Credential Operations
    // =========================================================================

    /// Insert a new credential into the pool.
    pub fn insert_credential(&self, credential: &AiCredential) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO ai_credentials (id, secret, priority, status, tier, error_count, last_checked)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                credential.id,
                credential.secret.expose_secret(),
                credential.priority,
                credential.status.as_str(),
                credential.tier.as_str(),
                credential.error_count,
                credential.last_checked.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    /// List all credentials ordered by priority.
    pub fn list_credentials(&self) -> Result<Vec<AiCredential>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, secret, priority, status, tier, error_count, last_checked
             FROM ai_credentials ORDER BY priority ASC, id ASC",
        )?;

        let rows = stmt.query_map([], row_to_credential)?;
        let mut credentials = Vec::new();
        for row in rows {
            credentials.push(row??);
        }
        Ok(credentials)
    }

    /// Reset every credential back to ACTIVE with a cleared error count.
    ///
    /// Operator escape hatch for a pool that was fully demoted by a quota
    /// window or provider outage. Returns the number of rows touched.
    pub fn reactivate_all(&self) -> Result<usize> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE ai_credentials SET status = 'ACTIVE', error_count = 0",
            [],
        )?;
        Ok(changed)
    }

    fn find_best_active_sync(&self) -> Result<Option<AiCredential>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, secret, priority, status, tier, error_count, last_checked
             FROM ai_credentials
             WHERE status = 'ACTIVE'
             ORDER BY priority ASC, id ASC
             LIMIT 1",
        )?;

        match stmt.query_row([], row_to_credential).optional()? {
            Some(credential) => Ok(Some(credential?)),
            None => Ok(None),
        }
    }

    fn record_outcome_sync(&self, id: &str, outcome: &CredentialOutcome) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE ai_credentials
             SET status = ?2, error_count = ?3, last_checked = ?4
             WHERE id = ?1",
            params![
                id,
                outcome.status.as_str(),
                outcome.error_count,
                outcome.last_checked.to_rfc3339(),
            ],
        )?;

        if changed == 0 {
            return Err(CondoError::Storage(format!(
                "cannot record outcome: credential '{}' not found",
                id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialRepository for Database {
    async fn find_best_active(&self) -> Result<Option<AiCredential>> {
        self.find_best_active_sync()
    }

    async fn record_outcome(&self, id: &str, outcome: &CredentialOutcome) -> Result<()> {
        self.record_outcome_sync(id, outcome)
    }
}

/// Map a credential row. Secrets go straight into `SecretString`; the
/// timestamp column is RFC 3339 text.
fn row_to_credential(row: &Row<'_>) -> rusqlite::Result<Result<AiCredential>> {
    let id: String = row.get(0)?;
    let secret: String = row.get(1)?;
    let priority: i64 = row.get(2)?;
    let status: String = row.get(3)?;
    let tier: String = row.get(4)?;
    let error_count: u32 = row.get(5)?;
    let last_checked: Option<String> = row.get(6)?;

    Ok(build_credential(
        id,
        secret,
        priority,
        &status,
        &tier,
        error_count,
        last_checked,
    ))
}

fn build_credential(
    id: String,
    secret: String,
    priority: i64,
    status: &str,
    tier: &str,
    error_count: u32,
    last_checked: Option<String>,
) -> Result<AiCredential> {
    let last_checked = match last_checked {
        Some(text) => Some(
            DateTime::parse_from_rfc3339(&text)
                .map_err(|e| CondoError::Storage(format!("bad last_checked timestamp: {}", e)))?
                .with_timezone(&Utc),
        ),
        None => None,
    };

    Ok(AiCredential {
        id,
        secret: SecretString::from(secret),
        priority,
        status: CredentialStatus::parse(status)?,
        tier: CredentialTier::parse(tier),
        error_count,
        last_checked,
    })
}
