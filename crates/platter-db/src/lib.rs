//! # platter-db: Database Layer for the Platter Storefront
//!
//! SQLite storage for the dish catalog and placed orders, using sqlx for
//! async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Platter Data Flow                                │
//! │                                                                         │
//! │  OrderService::place_order                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    platter-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ DishRepo      │    │ 001_initial_ │  │   │
//! │  │   │ SqlitePool    │◄───│ OrderRepo     │    │   schema.sql │  │   │
//! │  │   │ Transactions  │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (platter.db)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Dish and order repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use platter_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("platter.db")).await?;
//! let menu = db.dishes().list(&DishFilter::default()).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::dish::DishRepository;
pub use repository::order::OrderRepository;
