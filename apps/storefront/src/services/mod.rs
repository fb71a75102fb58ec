//! Storefront service implementations.

pub mod admin_service;
pub mod catalog_service;
pub mod order_service;

pub use admin_service::AdminService;
pub use catalog_service::CatalogService;
pub use order_service::{OrderService, PlaceOrderResponse};

use platter_core::AuthenticatedUser;

use crate::error::{StorefrontError, StorefrontResult};

/// Any signed-in caller.
pub(crate) fn require_user(user: Option<&AuthenticatedUser>) -> StorefrontResult<&AuthenticatedUser> {
    user.ok_or(StorefrontError::AuthenticationRequired)
}

/// A signed-in caller with the admin role.
pub(crate) fn require_admin(user: Option<&AuthenticatedUser>) -> StorefrontResult<&AuthenticatedUser> {
    let user = require_user(user)?;
    if !user.is_admin() {
        tracing::warn!(user_id = %user.id, "Admin access denied");
        return Err(StorefrontError::AdminRequired);
    }
    Ok(user)
}
