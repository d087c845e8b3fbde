/// Order and order line-item models
///
/// An order belongs to the user who raised it and holds zero or more line
/// items via `order_items.order_id`. Prices are integer amounts in the
/// smallest currency unit; the orders-with-total projection in
/// [`crate::reports`] sums them per order.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE orders (
///     id UUID PRIMARY KEY,
///     customer VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     payment VARCHAR(64) NOT NULL,
///     user_id UUID NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
///
/// CREATE TABLE order_items (
///     id UUID PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     price INTEGER NOT NULL,
///     order_id UUID NOT NULL REFERENCES orders(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Order record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,

    /// Customer name the order was raised for
    pub customer: String,

    pub description: String,

    /// Payment method label
    pub payment: String,

    /// User who raised the order
    pub user_id: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Single line item on an order
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: Uuid,
    pub name: String,

    /// Price in the smallest currency unit
    pub price: i32,

    pub order_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Input for creating an order
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrder {
    pub customer: String,
    pub description: String,
    pub payment: String,
    pub user_id: Uuid,
}

/// Input for adding a line item to an order
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderItem {
    pub name: String,
    pub price: i32,
    pub order_id: Uuid,
}

impl Order {
    /// Creates an order with a server-generated id
    pub async fn create(pool: &PgPool, data: CreateOrder) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (id, customer, description, payment, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, customer, description, payment, user_id,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.customer)
        .bind(data.description)
        .bind(data.payment)
        .bind(data.user_id)
        .fetch_one(pool)
        .await
    }

    /// Finds a live order by id
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Order>(
            r#"
            SELECT id, customer, description, payment, user_id,
                   created_at, updated_at, deleted_at
            FROM orders
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Soft-deletes an order
    ///
    /// Line items are left untouched; the aggregation joins filter them by
    /// the order tombstone already.
    pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE orders SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl OrderItem {
    /// Adds a line item to an order, id generated server-side
    pub async fn create(pool: &PgPool, data: CreateOrderItem) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, OrderItem>(
            r#"
            INSERT INTO order_items (id, name, price, order_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, price, order_id, created_at, updated_at, deleted_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.name)
        .bind(data.price)
        .bind(data.order_id)
        .fetch_one(pool)
        .await
    }

    /// Lists live items for an order
    pub async fn list_for_order(pool: &PgPool, order_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, name, price, order_id, created_at, updated_at, deleted_at
            FROM order_items
            WHERE order_id = $1 AND deleted_at IS NULL
            ORDER BY created_at
            "#,
        )
        .bind(order_id)
        .fetch_all(pool)
        .await
    }

    /// Soft-deletes a line item
    pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE order_items SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
