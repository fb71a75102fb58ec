//! # Repository Module
//!
//! Database repository implementations for the storefront.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderService / CatalogService                                         │
//! │       │                                                                 │
//! │       │  db.dishes().list(&filter)                                     │
//! │       │  DishRepository::find_available_on(&mut tx, &ids)              │
//! │       ▼                                                                 │
//! │  DishRepository                    OrderRepository                     │
//! │  ├── find_available(ids)           ├── insert / insert_on              │
//! │  ├── list(filter)                  ├── find_by_id / find_by_user       │
//! │  ├── get_by_id(id)                 ├── find_all / find_by_idem. key    │
//! │  └── insert / update               ├── set_status                      │
//! │                                    └── summary                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Methods on `&self` use the pool. Associated `*_on` functions take a
//! `&mut SqliteConnection` so several of them can share one transaction.

pub mod dish;
pub mod order;
