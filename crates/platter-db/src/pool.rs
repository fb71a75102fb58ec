//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  storefront startup                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure pool settings                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ├──► db.dishes()  / db.orders()    one-shot queries              │
//! │       └──► db.begin_immediate()          placement transaction         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! File databases run in WAL mode: readers don't block the writer and the
//! writer doesn't block readers. Writers are still serialized; read-then-write
//! work goes through [`Database::begin_immediate`].

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::dish::DishRepository;
use crate::repository::order::OrderRepository;

const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust
/// use platter_db::DbConfig;
///
/// let config = DbConfig::new("./platter.db")
///     .max_connections(8)
///     .min_connections(1);
/// assert_eq!(config.max_connections, 8);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Default: 5
    pub max_connections: u32,

    /// Default: 1
    pub min_connections: u32,

    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection. Default: 10 minutes
    pub idle_timeout: Duration,

    /// How long a connection waits for the write lock. Default: 30 seconds
    pub busy_timeout: Duration,

    /// Whether to run migrations on connect. Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a configuration for the database file at `path`.
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            busy_timeout: Duration::from_secs(30),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// // Fresh, isolated schema for each test
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            // Each in-memory connection is its own database
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cheap to clone; clones share the same pool.
///
/// ## Usage
/// ```rust,ignore
/// let menu = db.dishes().list(&DishFilter::default()).await?;
///
/// let mut tx = db.begin_immediate().await?;
/// let dishes = DishRepository::find_available_on(&mut tx, &ids).await?;
/// OrderRepository::insert_on(&mut tx, &order).await?;
/// tx.commit().await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite:
    ///    - WAL mode for concurrent reads (file databases)
    ///    - NORMAL synchronous
    ///    - Foreign keys enabled
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&config.database_path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
        };
        // SQLite ships with foreign keys off
        let connect_options = connect_options
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout);

        debug!("Connection options configured");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout));

        if config.is_in_memory() {
            // Dropping the only connection would drop the whole database
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(max_connections = config.max_connections, "Database pool created");

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Called by `new()` unless disabled.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the dish (catalog) repository.
    pub fn dishes(&self) -> DishRepository {
        DishRepository::new(self.pool.clone())
    }

    /// Returns the order repository.
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    /// Starts a deferred transaction. Dropping it without `commit()` rolls back.
    ///
    /// Fine for reads and for transactions whose first statement writes.
    pub async fn begin(&self) -> DbResult<Transaction<'static, Sqlite>> {
        let tx = self.pool.begin().await?;
        Ok(tx)
    }

    /// Starts a `BEGIN IMMEDIATE` transaction for read-then-write work.
    ///
    /// The write lock is held from the start, so a competing writer waits
    /// on `busy_timeout` rather than failing with "database is locked".
    pub async fn begin_immediate(&self) -> DbResult<Transaction<'static, Sqlite>> {
        let tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        Ok(tx)
    }

    /// Closes the pool. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        let (total, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
        assert_eq!(db.dishes().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db").max_connections(10).min_connections(2);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }

    #[tokio::test]
    async fn test_dropped_transaction_rolls_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        {
            let mut tx = db.begin().await.unwrap();
            sqlx::query(
                "INSERT INTO dishes (id, name, cuisine, category, price_cents, created_at, updated_at) \
                 VALUES ('d1', 'Samosa', 'Indian', 'Appetizers', 4000, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
            )
            .execute(&mut *tx)
            .await
            .unwrap();
        }

        assert_eq!(db.dishes().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_immediate_transaction_rolls_back_on_drop() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        {
            let mut tx = db.begin_immediate().await.unwrap();
            sqlx::query(
                "INSERT INTO dishes (id, name, cuisine, category, price_cents, created_at, updated_at) \
                 VALUES ('d1', 'Samosa', 'Indian', 'Appetizers', 4000, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
            )
            .execute(&mut *tx)
            .await
            .unwrap();
        }

        assert_eq!(db.dishes().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_closed_pool_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }
}
