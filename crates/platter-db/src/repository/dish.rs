//! # Dish Repository
//!
//! Database operations for the dish catalog.
//!
//! ## Key Operations
//! - Catalog lookup for order placement (`find_available`)
//! - Menu browsing with cuisine / category / veg filters
//! - CRUD used by seeding and the menu admin
//!
//! ## Catalog Lookup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Requested ids: [a, b, c]                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT ... WHERE is_available = 1 AND id IN (?, ?, ?)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Resolved: [a, c]       (b is unknown or switched off)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller compares counts and rejects the whole order                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Queries are built at runtime (`QueryBuilder`) so the crate builds
//! without a live `DATABASE_URL`.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use platter_core::{Dish, DishFilter, VegMode};

const DISH_COLUMNS: &str = "id, name, cuisine, category, is_veg, price_cents, image_url, \
                            description, is_available, created_at, updated_at";

/// Repository for dish database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = DishRepository::new(pool);
///
/// let menu = repo.list(&DishFilter::default()).await?;
/// let dishes = repo.find_available(&ids).await?;
/// ```
#[derive(Debug, Clone)]
pub struct DishRepository {
    pool: SqlitePool,
}

impl DishRepository {
    /// Creates a new DishRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DishRepository { pool }
    }

    /// Resolves `ids` to dishes that exist and are available.
    ///
    /// Unknown or unavailable ids are simply absent from the result; the
    /// result order is unspecified.
    pub async fn find_available(&self, ids: &[String]) -> DbResult<Vec<Dish>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_available_on(&mut conn, ids).await
    }

    /// Same as [`find_available`](Self::find_available), on a caller-owned
    /// connection (typically an open transaction).
    pub async fn find_available_on(conn: &mut SqliteConnection, ids: &[String]) -> DbResult<Vec<Dish>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        debug!(requested = ids.len(), "Resolving available dishes");

        let mut query: QueryBuilder<'_, Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM dishes WHERE is_available = 1 AND id IN (",
            DISH_COLUMNS
        ));
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id.as_str());
        }
        separated.push_unseparated(")");

        let dishes = query.build_query_as::<Dish>().fetch_all(&mut *conn).await?;

        debug!(resolved = dishes.len(), "Resolved available dishes");
        Ok(dishes)
    }

    /// Lists available dishes matching `filter`, newest first.
    pub async fn list(&self, filter: &DishFilter) -> DbResult<Vec<Dish>> {
        debug!(?filter, "Listing dishes");

        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM dishes WHERE is_available = 1", DISH_COLUMNS));

        if let Some(cuisine) = filter.cuisine() {
            query.push(" AND cuisine = ").push_bind(cuisine);
        }
        if let Some(category) = filter.category() {
            query.push(" AND category = ").push_bind(category);
        }
        match filter.veg_mode {
            VegMode::Veg => {
                query.push(" AND is_veg = 1");
            }
            VegMode::Nonveg => {
                query.push(" AND is_veg = 0");
            }
            VegMode::All => {}
        }
        query.push(" ORDER BY created_at DESC, name ASC");

        let dishes = query.build_query_as::<Dish>().fetch_all(&self.pool).await?;
        Ok(dishes)
    }

    /// Gets a dish by ID, available or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Dish>> {
        let dish = sqlx::query_as::<_, Dish>(&format!("SELECT {} FROM dishes WHERE id = ?1", DISH_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(dish)
    }

    /// Inserts a new dish.
    pub async fn insert(&self, dish: &Dish) -> DbResult<()> {
        debug!(id = %dish.id, name = %dish.name, "Inserting dish");

        sqlx::query(
            r#"
            INSERT INTO dishes (
                id, name, cuisine, category, is_veg, price_cents,
                image_url, description, is_available, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&dish.id)
        .bind(&dish.name)
        .bind(&dish.cuisine)
        .bind(&dish.category)
        .bind(dish.is_veg)
        .bind(dish.price_cents)
        .bind(&dish.image_url)
        .bind(&dish.description)
        .bind(dish.is_available)
        .bind(dish.created_at)
        .bind(dish.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, dish.id.clone()),
            other => other,
        })?;

        Ok(())
    }

    /// Updates an existing dish. Placed orders keep their snapshots.
    pub async fn update(&self, dish: &Dish) -> DbResult<()> {
        debug!(id = %dish.id, "Updating dish");

        let result = sqlx::query(
            r#"
            UPDATE dishes SET
                name = ?2,
                cuisine = ?3,
                category = ?4,
                is_veg = ?5,
                price_cents = ?6,
                image_url = ?7,
                description = ?8,
                is_available = ?9,
                updated_at = ?10
            WHERE id = ?1
            "#,
        )
        .bind(&dish.id)
        .bind(&dish.name)
        .bind(&dish.cuisine)
        .bind(&dish.category)
        .bind(dish.is_veg)
        .bind(dish.price_cents)
        .bind(&dish.image_url)
        .bind(&dish.description)
        .bind(dish.is_available)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Dish", &dish.id));
        }

        Ok(())
    }

    /// Switches a dish on or off the menu.
    pub async fn set_availability(&self, id: &str, available: bool) -> DbResult<()> {
        debug!(id = %id, available, "Setting dish availability");

        let result = sqlx::query("UPDATE dishes SET is_available = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(available)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Dish", id));
        }

        Ok(())
    }

    /// Removes every dish. Placed orders are unaffected.
    pub async fn delete_all(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM dishes").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Counts all dishes, available or not.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dishes")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::Duration;
    use uuid::Uuid;

    fn dish(name: &str, cuisine: &str, category: &str, is_veg: bool, rupees: i64, age_mins: i64) -> Dish {
        let created = Utc::now() - Duration::minutes(age_mins);
        Dish {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            cuisine: cuisine.to_string(),
            category: category.to_string(),
            is_veg,
            price_cents: rupees * 100,
            image_url: String::new(),
            description: String::new(),
            is_available: true,
            created_at: created,
            updated_at: created,
        }
    }

    async fn setup() -> (Database, Vec<Dish>) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let dishes = vec![
            dish("Butter Chicken", "Indian", "Mains", false, 320, 30),
            dish("Dal Makhani", "Indian", "Mains", true, 150, 20),
            dish("Tiramisu", "Italian", "Desserts", true, 180, 10),
        ];
        for d in &dishes {
            db.dishes().insert(d).await.unwrap();
        }
        (db, dishes)
    }

    #[tokio::test]
    async fn test_find_available_skips_unknown_and_disabled() {
        let (db, dishes) = setup().await;
        db.dishes().set_availability(&dishes[1].id, false).await.unwrap();

        let ids = vec![dishes[0].id.clone(), dishes[1].id.clone(), Uuid::new_v4().to_string()];
        let found = db.dishes().find_available(&ids).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Butter Chicken");
        assert_eq!(found[0].price_cents, 32_000);
    }

    #[tokio::test]
    async fn test_find_available_with_no_ids() {
        let (db, _) = setup().await;
        assert!(db.dishes().find_available(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_newest_first() {
        let (db, _) = setup().await;

        let all = db.dishes().list(&DishFilter::default()).await.unwrap();
        let names: Vec<_> = all.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Tiramisu", "Dal Makhani", "Butter Chicken"]);

        let indian_veg = db
            .dishes()
            .list(&DishFilter {
                cuisine: Some("Indian".to_string()),
                category: Some("all".to_string()),
                veg_mode: VegMode::Veg,
            })
            .await
            .unwrap();
        assert_eq!(indian_veg.len(), 1);
        assert_eq!(indian_veg[0].name, "Dal Makhani");

        let nonveg = db
            .dishes()
            .list(&DishFilter {
                veg_mode: VegMode::Nonveg,
                ..DishFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(nonveg.len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_get() {
        let (db, dishes) = setup().await;
        let mut changed = dishes[2].clone();
        changed.price_cents = 20_000;
        db.dishes().update(&changed).await.unwrap();

        let loaded = db.dishes().get_by_id(&changed.id).await.unwrap().unwrap();
        assert_eq!(loaded.price_cents, 20_000);
        assert_eq!(db.dishes().count().await.unwrap(), 3);

        let mut ghost = changed.clone();
        ghost.id = Uuid::new_v4().to_string();
        assert!(matches!(db.dishes().update(&ghost).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_insert() {
        let (db, dishes) = setup().await;
        let err = db.dishes().insert(&dishes[0]).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
