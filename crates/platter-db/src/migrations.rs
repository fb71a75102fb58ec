//! # Database Migrations
//!
//! Schema lives in `migrations/sqlite/*.sql` at the workspace root and is
//! embedded into the binary at compile time.
//!
//! ## Schema
//! ```text
//! ┌──────────────┐        ┌──────────────┐        ┌──────────────────┐
//! │    dishes    │        │    orders    │ 1    n │   order_items    │
//! │  ──────────  │        │  ──────────  │───────►│  ──────────────  │
//! │  id (PK)     │        │  id (PK)     │        │  order_id (FK)   │
//! │  price_cents │  copy  │  totals      │        │  position        │
//! │  is_available│ ─ ─ ─ ►│  status      │        │  dish snapshot   │
//! └──────────────┘        │  idem. key   │        └──────────────────┘
//!                         └──────────────┘
//! ```
//! `order_items.dish_id` is not a foreign key: a snapshot
//! outlives the dish it was copied from.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations.
///
/// Idempotent: applied migrations are tracked in `_sqlx_migrations` and
/// skipped on the next run.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)` for diagnostics.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}
