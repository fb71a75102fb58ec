//! Menu browsing.

use std::sync::Arc;

use tracing::debug;

use platter_core::{Dish, DishFilter};

use crate::error::{StorefrontError, StorefrontResult};
use crate::AppState;

/// Catalog service implementation.
pub struct CatalogService {
    state: Arc<AppState>,
}

impl CatalogService {
    pub fn new(state: Arc<AppState>) -> Self {
        CatalogService { state }
    }

    /// Available dishes matching `filter`, newest first.
    pub async fn list_dishes(&self, filter: &DishFilter) -> StorefrontResult<Vec<Dish>> {
        let dishes = self.state.db.dishes().list(filter).await?;
        debug!(count = dishes.len(), cuisine = ?filter.cuisine(), category = ?filter.category(), "Listed dishes");
        Ok(dishes)
    }

    pub async fn get_dish(&self, id: &str) -> StorefrontResult<Dish> {
        self.state
            .db
            .dishes()
            .get_by_id(id)
            .await?
            .ok_or_else(|| StorefrontError::not_found("Dish", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::services::test_support::{add_dish, state};
    use platter_core::VegMode;

    #[tokio::test]
    async fn test_list_filters_and_hides_unavailable() {
        let state = state().await;
        add_dish(&state, "Paneer Tikka", "Indian", 320).await;
        add_dish(&state, "Margherita", "Italian", 350).await;
        let off_menu = add_dish(&state, "Dal Makhani", "Indian", 220).await;
        state.db.dishes().set_availability(&off_menu.id, false).await.unwrap();

        let service = CatalogService::new(state.clone());

        let all = service.list_dishes(&DishFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let indian = service
            .list_dishes(&DishFilter {
                cuisine: Some("Indian".to_string()),
                category: Some("all".to_string()),
                veg_mode: VegMode::All,
            })
            .await
            .unwrap();
        assert_eq!(indian.len(), 1);
        assert_eq!(indian[0].name, "Paneer Tikka");

        let nonveg = service
            .list_dishes(&DishFilter {
                veg_mode: VegMode::Nonveg,
                ..DishFilter::default()
            })
            .await
            .unwrap();
        assert!(nonveg.is_empty());
    }

    #[tokio::test]
    async fn test_get_dish() {
        let state = state().await;
        let dish = add_dish(&state, "Masala Dosa", "South Indian", 120).await;
        let service = CatalogService::new(state);

        assert_eq!(service.get_dish(&dish.id).await.unwrap().name, "Masala Dosa");

        let err = service.get_dish("missing").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
