//! # Platter Storefront
//!
//! Service layer of the food-ordering storefront.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Storefront Services                             │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │ CatalogService │  │  OrderService  │  │  AdminService              ││
//! │  │                │  │                │  │                            ││
//! │  │ • list_dishes  │  │ • place_order  │  │ • summary                  ││
//! │  │ • get_dish     │  │ • get_order    │  │ • advance_order_status     ││
//! │  │                │  │ • my_orders    │  │                            ││
//! │  │                │  │ • all_orders   │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────┐│  │
//! │  │  │   SQLite     │  │ PricingPolicy│  │    JWT Auth              ││  │
//! │  │  │ (platter-db) │  │   (config)   │  │ Option<AuthenticatedUser>││  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The caller's identity is always an explicit argument; nothing here reads
//! it from ambient state.

pub mod auth;
pub mod config;
pub mod error;
pub mod services;

use std::sync::Arc;

use platter_db::Database;

pub use auth::JwtManager;
pub use config::{ConfigError, StorefrontConfig};
pub use error::{ErrorKind, ErrorResponse, StorefrontError, StorefrontResult};
pub use services::{AdminService, CatalogService, OrderService, PlaceOrderResponse};

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    pub db: Database,
    pub config: StorefrontConfig,
    pub jwt: JwtManager,
}

impl AppState {
    pub fn new(db: Database, config: StorefrontConfig) -> Self {
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_lifetime_secs);
        AppState { db, config, jwt }
    }

    /// Opens the configured database (running migrations) and builds the state.
    pub async fn connect(config: StorefrontConfig) -> StorefrontResult<Arc<Self>> {
        let db = Database::new(config.db_config()).await?;
        Ok(Arc::new(AppState::new(db, config)))
    }
}
