//! Admin-only views and order status updates.

use std::sync::Arc;

use tracing::info;

use platter_core::{AdminSummary, AuthenticatedUser, OrderStatus};
use platter_db::{DbError, OrderRepository};

use super::require_admin;
use crate::error::{StorefrontError, StorefrontResult};
use crate::AppState;

/// Admin service implementation.
pub struct AdminService {
    state: Arc<AppState>,
}

impl AdminService {
    pub fn new(state: Arc<AppState>) -> Self {
        AdminService { state }
    }

    /// Order counts and leaderboards across all customers.
    pub async fn summary(&self, user: Option<&AuthenticatedUser>) -> StorefrontResult<AdminSummary> {
        require_admin(user)?;
        Ok(self.state.db.orders().summary().await?)
    }

    /// Moves an order one step along its lifecycle and returns the new status.
    pub async fn advance_order_status(
        &self,
        user: Option<&AuthenticatedUser>,
        order_id: &str,
    ) -> StorefrontResult<OrderStatus> {
        let admin = require_admin(user)?;

        let mut tx = self.state.db.begin_immediate().await?;

        let current = OrderRepository::status_on(&mut tx, order_id)
            .await?
            .ok_or_else(|| StorefrontError::not_found("Order", order_id))?;
        let next = current.advance()?;

        OrderRepository::set_status_on(&mut tx, order_id, next).await?;
        tx.commit().await.map_err(DbError::from)?;

        info!(order_id, from = %current, to = %next, admin = %admin.id, "Order status advanced");
        Ok(next)
    }
}
