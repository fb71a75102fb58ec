//! # Order Repository
//!
//! Database operations for orders and their line snapshots.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. PLACE                                                              │
//! │     └── insert_on(tx, order)  → orders row + order_items rows          │
//! │         (same transaction as the catalog lookup)                       │
//! │                                                                         │
//! │  2. READ                                                               │
//! │     └── find_by_id / find_by_user / find_all                          │
//! │                                                                         │
//! │  3. ADVANCE                                                            │
//! │     └── set_status() → PLACED → CONFIRMED → ... → DELIVERED            │
//! │                                                                         │
//! │  Lines and totals are written once and never updated.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use platter_core::{
    AdminSummary, CuisineQuantity, CustomerOrderCount, DeliveryAddress, DishQuantity, Money, Order, OrderLine,
    OrderStatus, OrderTotals, PaymentMethod,
};

/// How many rows each admin leaderboard shows.
pub const SUMMARY_TOP_N: i64 = 10;

/// Order ids bound per `order_items` lookup; SQLite caps bound parameters.
const LINE_LOOKUP_CHUNK: usize = 500;

const ORDER_COLUMNS: &str = "id, user_id, user_email, subtotal_cents, tax_cents, delivery_fee_cents, \
                             grand_total_cents, full_name, phone, line1, line2, city, pincode, \
                             payment_method, status, idempotency_key, created_at, updated_at";

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, FromRow)]
struct OrderRow {
    id: String,
    user_id: Option<String>,
    user_email: Option<String>,
    subtotal_cents: i64,
    tax_cents: i64,
    delivery_fee_cents: i64,
    grand_total_cents: i64,
    full_name: String,
    phone: String,
    line1: String,
    line2: Option<String>,
    city: String,
    pincode: String,
    payment_method: PaymentMethod,
    status: OrderStatus,
    idempotency_key: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, lines: Vec<OrderLine>) -> Order {
        Order {
            id: self.id,
            lines,
            totals: OrderTotals {
                subtotal: Money::from_cents(self.subtotal_cents),
                tax: Money::from_cents(self.tax_cents),
                delivery_fee: Money::from_cents(self.delivery_fee_cents),
                grand_total: Money::from_cents(self.grand_total_cents),
            },
            address: DeliveryAddress {
                full_name: self.full_name,
                phone: self.phone,
                line1: self.line1,
                line2: self.line2,
                city: self.city,
                pincode: self.pincode,
            },
            payment_method: self.payment_method,
            status: self.status,
            user_id: self.user_id,
            user_email: self.user_email,
            idempotency_key: self.idempotency_key,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
    order_id: String,
    dish_id: String,
    name: String,
    unit_price_cents: i64,
    quantity: i64,
    is_veg: bool,
    category: String,
    cuisine: String,
}

impl From<OrderItemRow> for OrderLine {
    fn from(row: OrderItemRow) -> Self {
        OrderLine {
            dish_id: row.dish_id,
            name: row.name,
            unit_price_cents: row.unit_price_cents,
            quantity: row.quantity,
            is_veg: row.is_veg,
            category: row.category,
            cuisine: row.cuisine,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order in its own transaction.
    pub async fn insert(&self, order: &Order) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::insert_on(&mut tx, order).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Inserts the order row and one `order_items` row per line, in line
    /// order, on a caller-owned connection.
    ///
    /// ## Snapshot Pattern
    /// Dish name, price, veg flag, category and cuisine are copied into
    /// `order_items`. Later catalog edits never reach placed orders.
    pub async fn insert_on(conn: &mut SqliteConnection, order: &Order) -> DbResult<()> {
        debug!(
            id = %order.id,
            lines = order.lines.len(),
            grand_total = %order.totals.grand_total,
            "Inserting order"
        );

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, user_id, user_email,
                subtotal_cents, tax_cents, delivery_fee_cents, grand_total_cents,
                full_name, phone, line1, line2, city, pincode,
                payment_method, status, idempotency_key,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3,
                ?4, ?5, ?6, ?7,
                ?8, ?9, ?10, ?11, ?12, ?13,
                ?14, ?15, ?16,
                ?17, ?18
            )
            "#,
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(&order.user_email)
        .bind(order.totals.subtotal.cents())
        .bind(order.totals.tax.cents())
        .bind(order.totals.delivery_fee.cents())
        .bind(order.totals.grand_total.cents())
        .bind(&order.address.full_name)
        .bind(&order.address.phone)
        .bind(&order.address.line1)
        .bind(&order.address.line2)
        .bind(&order.address.city)
        .bind(&order.address.pincode)
        .bind(order.payment_method)
        .bind(order.status)
        .bind(&order.idempotency_key)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *conn)
        .await?;

        for (position, line) in order.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    order_id, position, dish_id, name, unit_price_cents,
                    quantity, is_veg, category, cuisine
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(&order.id)
            .bind(position as i64)
            .bind(&line.dish_id)
            .bind(&line.name)
            .bind(line.unit_price_cents)
            .bind(line.quantity)
            .bind(line.is_veg)
            .bind(&line.category)
            .bind(&line.cuisine)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Gets an order with its lines.
    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_by_id_on(&mut conn, id).await
    }

    pub async fn find_by_id_on(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        match row {
            Some(row) => Ok(Self::attach_lines(conn, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Id of the order created with `key`, if any.
    pub async fn find_by_idempotency_key_on(conn: &mut SqliteConnection, key: &str) -> DbResult<Option<String>> {
        let id: Option<String> = sqlx::query_scalar("SELECT id FROM orders WHERE idempotency_key = ?1")
            .bind(key)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(id)
    }

    /// Gets the order created with `key`, if any.
    pub async fn find_by_idempotency_key(&self, key: &str) -> DbResult<Option<Order>> {
        let mut conn = self.pool.acquire().await?;
        match Self::find_by_idempotency_key_on(&mut conn, key).await? {
            Some(id) => Self::find_by_id_on(&mut conn, &id).await,
            None => Ok(None),
        }
    }

    /// Orders placed by `user_id`, newest first.
    pub async fn find_by_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        self.find_all(Some(user_id)).await
    }

    /// All orders, newest first, optionally narrowed to one user.
    pub async fn find_all(&self, user_id: Option<&str>) -> DbResult<Vec<Order>> {
        let mut conn = self.pool.acquire().await?;

        let mut query: QueryBuilder<'_, Sqlite> = QueryBuilder::new(format!("SELECT {} FROM orders", ORDER_COLUMNS));
        if let Some(user_id) = user_id {
            query.push(" WHERE user_id = ").push_bind(user_id);
        }
        query.push(" ORDER BY created_at DESC, id DESC");

        let rows = query.build_query_as::<OrderRow>().fetch_all(&mut *conn).await?;
        debug!(count = rows.len(), user_id = ?user_id, "Loaded orders");

        Self::attach_lines(&mut conn, rows).await
    }

    /// Current status of an order, for read-check-write inside a transaction.
    pub async fn status_on(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<OrderStatus>> {
        let status: Option<OrderStatus> = sqlx::query_scalar("SELECT status FROM orders WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(status)
    }

    /// Writes `status` unconditionally. Lifecycle rules are the caller's job.
    pub async fn set_status(&self, id: &str, status: OrderStatus) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        Self::set_status_on(&mut conn, id, status).await
    }

    pub async fn set_status_on(conn: &mut SqliteConnection, id: &str, status: OrderStatus) -> DbResult<()> {
        debug!(id = %id, status = %status, "Updating order status");

        let result = sqlx::query("UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .bind(Utc::now())
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Aggregates for the admin dashboard.
    ///
    /// ```text
    /// total_orders         COUNT(*) over orders
    /// total_customers      distinct non-null user_id
    /// orders_per_customer  grouped by user_id, guests as "Unknown"
    /// top_dishes           Σ quantity by snapshot name
    /// top_cuisines         Σ quantity by snapshot cuisine
    /// ```
    /// Leaderboards are capped at [`SUMMARY_TOP_N`] and tie-break by name.
    pub async fn summary(&self) -> DbResult<AdminSummary> {
        let total_orders = self.count().await?;

        let total_customers: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT user_id) FROM orders WHERE user_id IS NOT NULL")
                .fetch_one(&self.pool)
                .await?;

        let orders_per_customer = sqlx::query_as::<_, CustomerOrderCount>(
            r#"
            SELECT COALESCE(MAX(user_email), 'Unknown') AS email, COUNT(*) AS orders_count
            FROM orders
            GROUP BY user_id
            ORDER BY orders_count DESC, email ASC
            LIMIT ?1
            "#,
        )
        .bind(SUMMARY_TOP_N)
        .fetch_all(&self.pool)
        .await?;

        let top_dishes = sqlx::query_as::<_, DishQuantity>(
            r#"
            SELECT name AS dish_name, SUM(quantity) AS total_qty
            FROM order_items
            GROUP BY name
            ORDER BY total_qty DESC, dish_name ASC
            LIMIT ?1
            "#,
        )
        .bind(SUMMARY_TOP_N)
        .fetch_all(&self.pool)
        .await?;

        let top_cuisines = sqlx::query_as::<_, CuisineQuantity>(
            r#"
            SELECT cuisine, SUM(quantity) AS total_qty
            FROM order_items
            GROUP BY cuisine
            ORDER BY total_qty DESC, cuisine ASC
            LIMIT ?1
            "#,
        )
        .bind(SUMMARY_TOP_N)
        .fetch_all(&self.pool)
        .await?;

        Ok(AdminSummary {
            total_orders,
            total_customers,
            orders_per_customer,
            top_dishes,
            top_cuisines,
        })
    }

    /// Loads the lines of every order in `rows`, one query per id chunk, keeping
    /// the row order and each order's line order.
    async fn attach_lines(conn: &mut SqliteConnection, rows: Vec<OrderRow>) -> DbResult<Vec<Order>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut lines: HashMap<String, Vec<OrderLine>> = HashMap::new();

        for chunk in rows.chunks(LINE_LOOKUP_CHUNK) {
            let mut query: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
                "SELECT order_id, dish_id, name, unit_price_cents, quantity, is_veg, category, cuisine \
                 FROM order_items WHERE order_id IN (",
            );
            let mut separated = query.separated(", ");
            for row in chunk {
                separated.push_bind(row.id.as_str());
            }
            separated.push_unseparated(") ORDER BY order_id, position");

            let items = query.build_query_as::<OrderItemRow>().fetch_all(&mut *conn).await?;
            for item in items {
                lines.entry(item.order_id.clone()).or_default().push(item.into());
            }
        }

        rows.into_iter()
            .map(|row| {
                let order_lines = lines.remove(&row.id).unwrap_or_default();
                if order_lines.is_empty() {
                    return Err(DbError::corrupt("Order", &row.id, "order has no lines"));
                }
                Ok(row.into_order(order_lines))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::Duration;
    use uuid::Uuid;

    fn line(name: &str, cuisine: &str, rupees: i64, qty: i64) -> OrderLine {
        OrderLine {
            dish_id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            unit_price_cents: rupees * 100,
            quantity: qty,
            is_veg: false,
            category: "Mains".to_string(),
            cuisine: cuisine.to_string(),
        }
    }

    fn order(user: Option<(&str, &str)>, lines: Vec<OrderLine>, age_mins: i64) -> Order {
        let subtotal: i64 = lines.iter().map(|l| l.unit_price_cents * l.quantity).sum();
        let created = Utc::now() - Duration::minutes(age_mins);
        Order {
            id: Uuid::new_v4().to_string(),
            lines,
            totals: OrderTotals {
                subtotal: Money::from_cents(subtotal),
                tax: Money::zero(),
                delivery_fee: Money::zero(),
                grand_total: Money::from_cents(subtotal),
            },
            address: DeliveryAddress {
                full_name: "Asha Rao".to_string(),
                phone: "9876543210".to_string(),
                line1: "12 MG Road".to_string(),
                line2: Some("Flat 4".to_string()),
                city: "Bengaluru".to_string(),
                pincode: "560001".to_string(),
            },
            payment_method: PaymentMethod::Card,
            status: OrderStatus::Placed,
            user_id: user.map(|(id, _)| id.to_string()),
            user_email: user.map(|(_, email)| email.to_string()),
            idempotency_key: None,
            created_at: created,
            updated_at: created,
        }
    }

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find_round_trip() {
        let db = setup().await;
        let placed = order(
            Some(("u1", "asha@example.com")),
            vec![line("Butter Chicken", "Indian", 320, 1), line("Dal Makhani", "Indian", 150, 2)],
            0,
        );
        db.orders().insert(&placed).await.unwrap();

        let loaded = db.orders().find_by_id(&placed.id).await.unwrap().unwrap();
        assert_eq!(loaded.lines, placed.lines);
        assert_eq!(loaded.totals, placed.totals);
        assert_eq!(loaded.address, placed.address);
        assert_eq!(loaded.payment_method, PaymentMethod::Card);
        assert_eq!(loaded.status, OrderStatus::Placed);
        assert_eq!(db.orders().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_order_is_none() {
        let db = setup().await;
        assert!(db.orders().find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_user_newest_first() {
        let db = setup().await;
        let older = order(Some(("u1", "a@x.com")), vec![line("Samosa", "Indian", 40, 1)], 60);
        let newer = order(Some(("u1", "a@x.com")), vec![line("Tacos", "Mexican", 220, 1)], 5);
        let other = order(Some(("u2", "b@x.com")), vec![line("Lasagna", "Italian", 350, 1)], 1);
        for o in [&older, &newer, &other] {
            db.orders().insert(o).await.unwrap();
        }

        let mine = db.orders().find_by_user("u1").await.unwrap();
        let ids: Vec<_> = mine.iter().map(|o| o.id.clone()).collect();
        assert_eq!(ids, vec![newer.id.clone(), older.id.clone()]);
        assert_eq!(mine[0].lines[0].name, "Tacos");

        assert_eq!(db.orders().find_all(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_find_all_loads_lines_past_one_lookup_chunk() {
        let db = setup().await;
        let total = LINE_LOOKUP_CHUNK * 2 + 3;
        for i in 0..total {
            let placed = order(None, vec![line(&format!("Dish {}", i), "Indian", 40, 1)], 0);
            db.orders().insert(&placed).await.unwrap();
        }

        let all = db.orders().find_all(None).await.unwrap();
        assert_eq!(all.len(), total);
        assert!(all.iter().all(|o| o.lines.len() == 1));
    }

    #[tokio::test]
    async fn test_idempotency_key_is_unique() {
        let db = setup().await;
        let mut first = order(None, vec![line("Samosa", "Indian", 40, 1)], 0);
        first.idempotency_key = Some("checkout-1".to_string());
        db.orders().insert(&first).await.unwrap();

        let found = db.orders().find_by_idempotency_key("checkout-1").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);

        let mut second = order(None, vec![line("Samosa", "Indian", 40, 1)], 0);
        second.idempotency_key = Some("checkout-1".to_string());
        let err = db.orders().insert(&second).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(db.orders().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_set_status() {
        let db = setup().await;
        let placed = order(None, vec![line("Samosa", "Indian", 40, 1)], 0);
        db.orders().insert(&placed).await.unwrap();

        db.orders().set_status(&placed.id, OrderStatus::Confirmed).await.unwrap();
        let loaded = db.orders().find_by_id(&placed.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Confirmed);

        let err = db.orders().set_status("missing", OrderStatus::Confirmed).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_summary() {
        let db = setup().await;
        let orders = [
            order(Some(("u1", "a@x.com")), vec![line("Biryani", "Indian", 280, 2)], 3),
            order(Some(("u1", "a@x.com")), vec![line("Biryani", "Indian", 280, 1)], 2),
            order(
                Some(("u2", "b@x.com")),
                vec![line("Tacos", "Mexican", 220, 1), line("Churros", "Mexican", 120, 4)],
                1,
            ),
            order(None, vec![line("Lasagna", "Italian", 350, 1)], 0),
        ];
        for o in &orders {
            db.orders().insert(o).await.unwrap();
        }

        let summary = db.orders().summary().await.unwrap();
        assert_eq!(summary.total_orders, 4);
        assert_eq!(summary.total_customers, 2);
        assert_eq!(
            summary.orders_per_customer[0],
            CustomerOrderCount {
                email: "a@x.com".to_string(),
                orders_count: 2
            }
        );
        assert!(summary.orders_per_customer.iter().any(|c| c.email == "Unknown"));
        assert_eq!(summary.top_dishes[0].dish_name, "Churros");
        assert_eq!(summary.top_dishes[0].total_qty, 4);
        assert_eq!(summary.top_cuisines[0].cuisine, "Mexican");
        assert_eq!(summary.top_cuisines[0].total_qty, 5);
    }
}
