//! # Order Assembly
//!
//! Turns a validated request plus the dishes the catalog resolved into a
//! complete [`Order`], ready to persist.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidatedOrder { lines: [(dish_id, qty)], address, payment, key }      │
//! │       │                                                                 │
//! │       │   + resolved dishes (available only, any order)                 │
//! │       ▼                                                                 │
//! │  build_order_lines() ── any id unresolved? ──► ItemsUnavailable         │
//! │       │                                        (whole order rejected)   │
//! │       ▼                                                                 │
//! │  [OrderLine snapshot, ...]  (request order preserved)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  calculate_totals() ──► Order { status: PLACED, ... }                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here touches storage; ids and timestamps come from the caller.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::totals::{calculate_totals, PricingPolicy};
use crate::types::{AuthenticatedUser, Dish, Order, OrderLine, OrderStatus, RequestedLine};
use crate::validation::ValidatedOrder;

/// Snapshots every requested line against the resolved dishes.
///
/// All-or-nothing: if any requested dish is missing from `resolved`
/// (deleted, unknown or unavailable), no lines are produced at all.
/// `resolved` may come back from storage in any order.
pub fn build_order_lines(requested: &[RequestedLine], resolved: &[Dish]) -> CoreResult<Vec<OrderLine>> {
    let by_id: HashMap<&str, &Dish> = resolved
        .iter()
        .filter(|dish| dish.is_available)
        .map(|dish| (dish.id.as_str(), dish))
        .collect();

    let missing: Vec<String> = requested
        .iter()
        .filter(|line| !by_id.contains_key(line.dish_id.as_str()))
        .map(|line| line.dish_id.clone())
        .collect();

    if !missing.is_empty() {
        return Err(CoreError::ItemsUnavailable {
            requested: requested.len(),
            resolved: requested.len() - missing.len(),
            missing,
        });
    }

    Ok(requested
        .iter()
        .map(|line| OrderLine::snapshot(by_id[line.dish_id.as_str()], line.qty))
        .collect())
}

/// Builds a new order in the initial `PLACED` state.
pub fn assemble_order(
    order_id: String,
    request: ValidatedOrder,
    resolved: &[Dish],
    policy: &PricingPolicy,
    user: Option<&AuthenticatedUser>,
    now: DateTime<Utc>,
) -> CoreResult<Order> {
    let lines = build_order_lines(&request.lines, resolved)?;
    let totals = calculate_totals(&lines, policy);

    Ok(Order {
        id: order_id,
        lines,
        totals,
        address: request.address,
        payment_method: request.payment_method,
        status: OrderStatus::Placed,
        user_id: user.map(|u| u.id.clone()),
        user_email: user.map(|u| u.email.clone()),
        idempotency_key: request.idempotency_key,
        created_at: now,
        updated_at: now,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{DeliveryAddress, PaymentMethod, UserRole};

    fn dish(id: &str, name: &str, rupees: i64) -> Dish {
        let now = Utc::now();
        Dish {
            id: id.to_string(),
            name: name.to_string(),
            cuisine: "Indian".to_string(),
            category: "Mains".to_string(),
            is_veg: false,
            price_cents: rupees * 100,
            image_url: String::new(),
            description: String::new(),
            is_available: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn line(id: &str, qty: i64) -> RequestedLine {
        RequestedLine {
            dish_id: id.to_string(),
            qty,
        }
    }

    fn request(lines: Vec<RequestedLine>) -> ValidatedOrder {
        ValidatedOrder {
            lines,
            address: DeliveryAddress {
                full_name: "Asha Rao".to_string(),
                phone: "9876543210".to_string(),
                line1: "12 MG Road".to_string(),
                line2: None,
                city: "Bengaluru".to_string(),
                pincode: "560001".to_string(),
            },
            payment_method: PaymentMethod::Upi,
            idempotency_key: None,
        }
    }

    #[test]
    fn test_lines_follow_request_order() {
        let resolved = vec![dish("b", "Dal Makhani", 150), dish("a", "Butter Chicken", 320)];
        let lines = build_order_lines(&[line("a", 1), line("b", 2)], &resolved).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].name, "Butter Chicken");
        assert_eq!(lines[0].unit_price(), Money::from_major(320));
        assert_eq!(lines[1].quantity, 2);
        assert_eq!(lines[1].line_total(), Money::from_major(300));
    }

    #[test]
    fn test_missing_dish_rejects_everything() {
        let resolved = vec![dish("a", "Butter Chicken", 320)];
        let err = build_order_lines(&[line("a", 1), line("ghost", 1)], &resolved).unwrap_err();

        match err {
            CoreError::ItemsUnavailable {
                requested,
                resolved,
                missing,
            } => {
                assert_eq!(requested, 2);
                assert_eq!(resolved, 1);
                assert_eq!(missing, vec!["ghost".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unavailable_dish_is_treated_as_missing() {
        let mut off_menu = dish("a", "Biryani", 280);
        off_menu.is_available = false;
        let result = build_order_lines(&[line("a", 1)], &[off_menu]);
        assert!(matches!(result, Err(CoreError::ItemsUnavailable { .. })));
    }

    #[test]
    fn test_assembled_order_is_placed_with_matching_totals() {
        let resolved = vec![dish("a", "Butter Chicken", 320), dish("b", "Dal Makhani", 150)];
        let user = AuthenticatedUser {
            id: "user-1".to_string(),
            email: "asha@example.com".to_string(),
            role: UserRole::Customer,
        };
        let policy = PricingPolicy::default();
        let order = assemble_order(
            "order-1".to_string(),
            request(vec![line("a", 1), line("b", 2)]),
            &resolved,
            &policy,
            Some(&user),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(order.status, OrderStatus::Placed);
        assert_eq!(order.totals, calculate_totals(&order.lines, &policy));
        assert_eq!(order.totals.grand_total, Money::from_major(651));
        assert_eq!(order.user_id.as_deref(), Some("user-1"));
        assert_eq!(order.user_email.as_deref(), Some("asha@example.com"));
        assert_eq!(order.item_count(), 3);
    }

    #[test]
    fn test_snapshot_is_independent_of_later_catalog_edits() {
        let mut resolved = vec![dish("a", "Butter Chicken", 320)];
        let lines = build_order_lines(&[line("a", 1)], &resolved).unwrap();

        resolved[0].price_cents = 99_900;
        resolved[0].name = "Renamed".to_string();

        assert_eq!(lines[0].unit_price_cents, 32_000);
        assert_eq!(lines[0].name, "Butter Chicken");
    }
}
