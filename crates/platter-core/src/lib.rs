//! # platter-core: Pure Business Logic for the Platter Storefront
//!
//! This crate holds the rules that decide what an order costs and what an
//! order looks like once placed. Everything here is a pure function with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Platter Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  apps/storefront (services)                     │   │
//! │  │   place_order, list_dishes, my_orders, admin summary            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ platter-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  totals   │  │   order   │  │ validation│  │   │
//! │  │   │   Dish    │  │  Pricing  │  │ snapshots │  │  request  │  │   │
//! │  │   │   Order   │  │  Policy   │  │ lifecycle │  │  schema   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                platter-db (Database Layer)                      │   │
//! │  │            SQLite queries, migrations, repositories             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Dish, Order, OrderLine, OrderStatus, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`totals`] - The totals calculator and its pricing policy
//! - [`order`] - Turning requested lines into immutable order snapshots
//! - [`validation`] - The request validation layer
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use platter_core::money::Money;
//! use platter_core::totals::{calculate_totals, PricingPolicy, TotalsLine};
//!
//! let lines = [
//!     TotalsLine::new(Money::from_major(320), 1),
//!     TotalsLine::new(Money::from_major(150), 2),
//! ];
//! let totals = calculate_totals(&lines, &PricingPolicy::default());
//!
//! assert_eq!(totals.subtotal, Money::from_major(620));
//! assert_eq!(totals.tax, Money::from_major(31));
//! assert!(totals.delivery_fee.is_zero());
//! assert_eq!(totals.grand_total, Money::from_major(651));
//! ```

pub mod error;
pub mod money;
pub mod order;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError, ValidationErrors};
pub use money::Money;
pub use totals::{calculate_totals, OrderTotals, PricingPolicy};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct dishes allowed in a single order.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single dish in an order.
///
/// Prevents accidental over-ordering (typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Default tax rate: 5% expressed in basis points.
pub const DEFAULT_TAX_RATE_BPS: u32 = 500;

/// Orders with a subtotal strictly above this (₹500.00) ship for free.
pub const DEFAULT_FREE_DELIVERY_ABOVE_CENTS: i64 = 50_000;

/// Delivery fee charged when the free-delivery threshold is not exceeded (₹50.00).
pub const DEFAULT_DELIVERY_FEE_CENTS: i64 = 5_000;
