//! # Totals Calculator
//!
//! Turns a list of priced lines into subtotal, tax, delivery fee and grand
//! total.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. subtotal     = Σ price × qty                                        │
//! │  2. tax          = subtotal × tax_rate          (5%, rounded to paisa)  │
//! │  3. delivery_fee = 0 if subtotal > threshold    (₹500)                  │
//! │                    else fee                     (₹50)                   │
//! │  4. grand_total  = subtotal + tax + delivery_fee                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rate, threshold and fee all live in [`PricingPolicy`]; call sites never
//! hardcode them.
//!
//! Subtotal and fee are whole paise already, so `tax` is the only value
//! that needs rounding and `grand_total` is an exact sum.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::TaxRate;
use crate::{DEFAULT_DELIVERY_FEE_CENTS, DEFAULT_FREE_DELIVERY_ABOVE_CENTS};

// =============================================================================
// Inputs
// =============================================================================

/// Anything with a unit price and a quantity can be totalled.
pub trait PricedLine {
    fn unit_price(&self) -> Money;
    fn quantity(&self) -> i64;
}

/// A bare `{price, qty}` pair, for totalling carts that are not orders yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsLine {
    pub price: Money,
    pub qty: i64,
}

impl TotalsLine {
    pub const fn new(price: Money, qty: i64) -> Self {
        TotalsLine { price, qty }
    }
}

impl PricedLine for TotalsLine {
    fn unit_price(&self) -> Money {
        self.price
    }

    fn quantity(&self) -> i64 {
        self.qty
    }
}

impl<T: PricedLine> PricedLine for &T {
    fn unit_price(&self) -> Money {
        (**self).unit_price()
    }

    fn quantity(&self) -> i64 {
        (**self).quantity()
    }
}

// =============================================================================
// Pricing Policy
// =============================================================================

/// The three knobs of the totals formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricingPolicy {
    pub tax_rate: TaxRate,
    /// Delivery is free when the subtotal is strictly greater than this.
    pub free_delivery_above: Money,
    pub delivery_fee: Money,
}

impl Default for PricingPolicy {
    /// 5% tax, free delivery above ₹500, otherwise ₹50.
    fn default() -> Self {
        PricingPolicy {
            tax_rate: TaxRate::default(),
            free_delivery_above: Money::from_cents(DEFAULT_FREE_DELIVERY_ABOVE_CENTS),
            delivery_fee: Money::from_cents(DEFAULT_DELIVERY_FEE_CENTS),
        }
    }
}

impl PricingPolicy {
    /// Delivery fee for a given subtotal.
    ///
    /// The comparison is strict: a subtotal of exactly ₹500 still pays.
    pub fn delivery_fee_for(&self, subtotal: Money) -> Money {
        if subtotal > self.free_delivery_above {
            Money::zero()
        } else {
            self.delivery_fee
        }
    }

    /// The "add ₹X more for free delivery" hint shown on the cart.
    ///
    /// `threshold - subtotal` below the threshold, zero from the threshold
    /// up. A subtotal of exactly ₹500 gets no hint even though it still
    /// pays the fee.
    pub fn amount_to_free_delivery(&self, subtotal: Money) -> Money {
        self.free_delivery_above.saturating_sub_to_zero(subtotal)
    }
}

// =============================================================================
// Output
// =============================================================================

/// The derived monetary breakdown of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub delivery_fee: Money,
    pub grand_total: Money,
}

/// Computes the totals for `lines` under `policy`.
///
/// Pure and deterministic; an empty list is valid and yields a zero
/// subtotal that still pays the delivery fee.
///
/// ## Example
/// ```rust
/// use platter_core::money::Money;
/// use platter_core::totals::{calculate_totals, PricingPolicy, TotalsLine};
///
/// let totals = calculate_totals(&[TotalsLine::new(Money::from_major(40), 1)], &PricingPolicy::default());
/// assert_eq!(totals.tax, Money::from_major(2));
/// assert_eq!(totals.delivery_fee, Money::from_major(50));
/// assert_eq!(totals.grand_total, Money::from_major(92));
/// ```
pub fn calculate_totals<L: PricedLine>(lines: &[L], policy: &PricingPolicy) -> OrderTotals {
    let subtotal: Money = lines
        .iter()
        .map(|line| line.unit_price().multiply_quantity(line.quantity()))
        .sum();
    let tax = subtotal.calculate_tax(policy.tax_rate);
    let delivery_fee = policy.delivery_fee_for(subtotal);

    OrderTotals {
        subtotal,
        tax,
        delivery_fee,
        grand_total: subtotal + tax + delivery_fee,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
