//! Order placement and order queries.
//!
//! ## Placement Flow
//! ```text
//! PlaceOrderRequest
//!       │ validate()            ──► VALIDATION_ERROR (every failing field)
//!       ▼
//! BEGIN ─► idempotency key seen? ──► return existing order id
//!       │
//!       ├─► find_available_on(ids)
//!       ├─► assemble_order()    ──► VALIDATION_ERROR (missing ids), ROLLBACK
//!       ├─► insert_on(order)
//!       ▼
//! COMMIT ─► { orderId }
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use platter_core::order::assemble_order;
use platter_core::validation::PlaceOrderRequest;
use platter_core::{AuthenticatedUser, Order};
use platter_db::{DbError, DishRepository, OrderRepository};

use super::{require_admin, require_user};
use crate::error::{StorefrontError, StorefrontResult};
use crate::AppState;

/// Result of a successful placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub order_id: String,
}

/// Order service implementation.
pub struct OrderService {
    state: Arc<AppState>,
}

impl OrderService {
    pub fn new(state: Arc<AppState>) -> Self {
        OrderService { state }
    }

    /// Places an order for the given caller (guest when `user` is `None`).
    ///
    /// Either the whole order is stored or nothing is: validation and
    /// catalog failures happen before the insert, and storage failures
    /// roll the transaction back.
    pub async fn place_order(
        &self,
        request: &PlaceOrderRequest,
        user: Option<&AuthenticatedUser>,
    ) -> StorefrontResult<PlaceOrderResponse> {
        let validated = request.validate()?;

        let mut tx = self.state.db.begin_immediate().await?;

        if let Some(key) = validated.idempotency_key.as_deref() {
            if let Some(order_id) = OrderRepository::find_by_idempotency_key_on(&mut tx, key).await? {
                info!(order_id = %order_id, "Idempotent replay of placed order");
                return Ok(PlaceOrderResponse { order_id });
            }
        }

        let dishes = DishRepository::find_available_on(&mut tx, &validated.dish_ids()).await?;

        let order = assemble_order(
            Uuid::new_v4().to_string(),
            validated,
            &dishes,
            &self.state.config.pricing,
            user,
            Utc::now(),
        )
        .inspect_err(|e| debug!(error = %e, "Order rejected against catalog"))?;

        match OrderRepository::insert_on(&mut tx, &order).await {
            Ok(()) => {}
            Err(DbError::UniqueViolation { field, .. }) if field.ends_with("idempotency_key") => {
                // A concurrent placement with the same key committed first
                drop(tx);
                return self.replay(&order).await;
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(
            order_id = %order.id,
            lines = order.lines.len(),
            grand_total_cents = order.totals.grand_total.cents(),
            guest = order.user_id.is_none(),
            "Order placed"
        );

        Ok(PlaceOrderResponse { order_id: order.id })
    }

    /// Like [`place_order`](Self::place_order), but guests are turned away
    /// before the request is looked at.
    pub async fn place_order_as_customer(
        &self,
        request: &PlaceOrderRequest,
        user: Option<&AuthenticatedUser>,
    ) -> StorefrontResult<PlaceOrderResponse> {
        let user = require_user(user)?;
        self.place_order(request, Some(user)).await
    }

    async fn replay(&self, rejected: &Order) -> StorefrontResult<PlaceOrderResponse> {
        let key = rejected.idempotency_key.as_deref().unwrap_or_default();
        match self.state.db.orders().find_by_idempotency_key(key).await? {
            Some(existing) => {
                warn!(order_id = %existing.id, "Concurrent placement resolved to existing order");
                Ok(PlaceOrderResponse { order_id: existing.id })
            }
            None => Err(StorefrontError::Internal(format!(
                "order for idempotency key '{}' vanished",
                key
            ))),
        }
    }

    /// Gets an order by id.
    pub async fn get_order(&self, id: &str) -> StorefrontResult<Order> {
        self.state
            .db
            .orders()
            .find_by_id(id)
            .await?
            .ok_or_else(|| StorefrontError::not_found("Order", id))
    }

    /// The caller's own orders, newest first.
    pub async fn my_orders(&self, user: Option<&AuthenticatedUser>) -> StorefrontResult<Vec<Order>> {
        let user = require_user(user)?;
        Ok(self.state.db.orders().find_by_user(&user.id).await?)
    }

    /// Every order (optionally one customer's), newest first. Admin only.
    pub async fn all_orders(
        &self,
        user: Option<&AuthenticatedUser>,
        user_filter: Option<&str>,
    ) -> StorefrontResult<Vec<Order>> {
        require_admin(user)?;
        Ok(self.state.db.orders().find_all(user_filter).await?)
    }
}
