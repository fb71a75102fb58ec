//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Dish       │   │      Order      │   │   OrderLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  dish_id        │       │
//! │  │  name, cuisine  │──►│  lines ─────────┼──►│  name (frozen)  │       │
//! │  │  price_cents    │   │  totals         │   │  price (frozen) │       │
//! │  │  is_available   │   │  status         │   │  quantity       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │  OrderStatus    │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  PLACED → ...   │   │  UPI            │       │
//! │  │  500 = 5%       │   │  → DELIVERED    │   │  CARD / COD     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::totals::{OrderTotals, PricedLine};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 500 bps = 5%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Dish (catalog item)
// =============================================================================

/// A sellable dish in the catalog.
///
/// Owned by the catalog store; the order workflow only ever reads it and
/// copies what it needs into an [`OrderLine`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Dish {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the menu and in order history.
    pub name: String,

    /// Cuisine tag ("Indian", "Italian", ...).
    pub cuisine: String,

    /// Menu section ("Starters", "Mains", ...).
    pub category: String,

    /// Vegetarian flag.
    pub is_veg: bool,

    /// Price in paise.
    pub price_cents: i64,

    pub image_url: String,

    pub description: String,

    /// Unavailable dishes stay in the catalog but cannot be ordered.
    pub is_available: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Dish {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Vegetarian filter used when browsing the menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum VegMode {
    #[default]
    All,
    Veg,
    Nonveg,
}

impl FromStr for VegMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" | "" => Ok(VegMode::All),
            "veg" => Ok(VegMode::Veg),
            "nonveg" => Ok(VegMode::Nonveg),
            other => Err(format!("unknown veg mode '{}'", other)),
        }
    }
}

/// Menu browsing filter. `None` (or the literal `"all"`) means no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DishFilter {
    pub cuisine: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub veg_mode: VegMode,
}

impl DishFilter {
    /// Cuisine to filter on, with `"all"` and blanks treated as no filter.
    pub fn cuisine(&self) -> Option<&str> {
        normalize_filter(self.cuisine.as_deref())
    }

    /// Category to filter on, with `"all"` and blanks treated as no filter.
    pub fn category(&self) -> Option<&str> {
        normalize_filter(self.category.as_deref())
    }
}

fn normalize_filter(value: Option<&str>) -> Option<&str> {
    match value.map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(v) => Some(v),
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer intends to pay. Capture happens elsewhere.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum PaymentMethod {
    Upi,
    Card,
    /// Cash on delivery.
    Cod,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Upi, PaymentMethod::Card, PaymentMethod::Cod];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Cod => "COD",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or(())
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Order lifecycle.
///
/// ```text
/// PLACED ──► CONFIRMED ──► PREPARING ──► OUT_FOR_DELIVERY ──► DELIVERED
/// (initial)                                                  (terminal)
/// ```
///
/// Linear and monotonic: no cancellation, no going back.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum OrderStatus {
    #[default]
    Placed,
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    /// Every status in lifecycle order.
    pub const LIFECYCLE: [OrderStatus; 5] = [
        OrderStatus::Placed,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "PLACED",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::OutForDelivery => "OUT_FOR_DELIVERY",
            OrderStatus::Delivered => "DELIVERED",
        }
    }

    /// The following lifecycle state, or `None` once delivered.
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Placed => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::OutForDelivery),
            OrderStatus::OutForDelivery => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    /// Only the immediate successor is a legal transition.
    pub fn can_advance_to(&self, target: OrderStatus) -> bool {
        self.next() == Some(target)
    }

    /// Moves one step forward through the lifecycle.
    pub fn advance(&self) -> CoreResult<OrderStatus> {
        self.next().ok_or(CoreError::InvalidStatusTransition {
            from: *self,
            to: *self,
        })
    }

    /// Validates a transition to `target`.
    pub fn transition_to(&self, target: OrderStatus) -> CoreResult<OrderStatus> {
        if self.can_advance_to(target) {
            Ok(target)
        } else {
            Err(CoreError::InvalidStatusTransition {
                from: *self,
                to: target,
            })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::LIFECYCLE
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(())
    }
}

// =============================================================================
// Identity
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
}

/// Caller identity resolved by an external auth collaborator.
///
/// Always passed explicitly into service calls, never read from ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

// =============================================================================
// Requested Line / Order Line
// =============================================================================

/// One `(dish, quantity)` pair exactly as the client asked for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RequestedLine {
    pub dish_id: String,
    pub qty: i64,
}

/// A line item in an order.
/// Uses snapshot pattern to freeze dish data at time of ordering.
///
/// Serialized as `{catalogItemId, name, price, qty, isVeg, category, cuisine}`
/// with `price` in paise like the order totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLine {
    #[serde(rename = "catalogItemId")]
    pub dish_id: String,
    /// Dish name at time of order (frozen).
    pub name: String,
    /// Unit price in paise at time of order (frozen).
    #[serde(rename = "price")]
    pub unit_price_cents: i64,
    #[serde(rename = "qty")]
    pub quantity: i64,
    pub is_veg: bool,
    pub category: String,
    pub cuisine: String,
}

impl OrderLine {
    /// Freezes a dish into an order line.
    pub fn snapshot(dish: &Dish, quantity: i64) -> Self {
        OrderLine {
            dish_id: dish.id.clone(),
            name: dish.name.clone(),
            unit_price_cents: dish.price_cents,
            quantity,
            is_veg: dish.is_veg,
            category: dish.category.clone(),
            cuisine: dish.cuisine.clone(),
        }
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

impl PricedLine for OrderLine {
    fn unit_price(&self) -> Money {
        OrderLine::unit_price(self)
    }

    fn quantity(&self) -> i64 {
        self.quantity
    }
}

// =============================================================================
// Delivery Address
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DeliveryAddress {
    pub full_name: String,
    pub phone: String,
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub pincode: String,
}

// =============================================================================
// Order
// =============================================================================

/// A placed order.
///
/// Created once at placement; afterwards only `status` (and `updated_at`)
/// ever change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    pub id: String,
    #[serde(rename = "items")]
    pub lines: Vec<OrderLine>,
    pub totals: OrderTotals,
    pub address: DeliveryAddress,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    /// Id of the customer who placed the order, if signed in.
    pub user_id: Option<String>,
    /// Email of the customer at time of order (frozen).
    pub user_email: Option<String>,
    /// Client-supplied deduplication key.
    pub idempotency_key: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Total number of units across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Admin Summary
// =============================================================================

/// Orders placed by one customer. Guest orders are grouped under `"Unknown"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CustomerOrderCount {
    pub email: String,
    pub orders_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DishQuantity {
    pub dish_name: String,
    pub total_qty: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CuisineQuantity {
    pub cuisine: String,
    pub total_qty: i64,
}

/// Dashboard numbers for the admin view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AdminSummary {
    pub total_orders: i64,
    /// Distinct signed-in customers that have placed at least one order.
    pub total_customers: i64,
    pub orders_per_customer: Vec<CustomerOrderCount>,
    pub top_dishes: Vec<DishQuantity>,
    pub top_cuisines: Vec<CuisineQuantity>,
}

// =============================================================================
// Unit Tests
// =============================================================================
