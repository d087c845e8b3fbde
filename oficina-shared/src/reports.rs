/// Read-only denormalized projections
///
/// These queries return joined/grouped rows rather than raw entity graphs.
/// They take no locks and tolerate concurrent writes at whatever isolation
/// the store provides (read-committed or stronger); a failed query propagates
/// as an error instead of partial data.
///
/// Two deliberate policy choices live here:
///
/// - Orders with zero line items still appear in the totals listing with
///   `total = 0` (LEFT JOIN + COALESCE). The earlier inner-join behavior
///   silently dropped them.
/// - A pending service whose owning user is missing or soft-deleted keeps its
///   row and reports a null `user_name` instead of disappearing.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// One row per live order with the sum of its live line-item prices
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderSummary {
    pub id: Uuid,
    pub description: String,
    pub customer: String,
    pub created_at: DateTime<Utc>,

    /// Sum of line-item prices; 0 when the order has no items
    pub total: i64,
}

impl OrderSummary {
    /// Lists every live order with its line-item total
    ///
    /// Soft-deleted line items are excluded inside the join condition so a
    /// tombstoned item neither contributes to the sum nor drops the order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, OrderSummary>(
            r#"
            SELECT o.id, o.description, o.customer, o.created_at,
                   COALESCE(SUM(oi.price), 0) AS total
            FROM orders o
            LEFT JOIN order_items oi
                   ON oi.order_id = o.id AND oi.deleted_at IS NULL
            WHERE o.deleted_at IS NULL
            GROUP BY o.id, o.description, o.customer, o.created_at
            ORDER BY o.created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }
}

/// One row per live pending service with its requester's name
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PendingServiceSummary {
    pub id: Uuid,

    /// Display name of the owning user; null when the user is missing or
    /// soft-deleted
    pub user_name: Option<String>,

    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl PendingServiceSummary {
    /// Lists every live pending service joined to its requester
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, PendingServiceSummary>(
            r#"
            SELECT ps.id, u.name AS user_name, ps.description, ps.created_at
            FROM pending_services ps
            LEFT JOIN users u
                   ON u.id = ps.user_id AND u.deleted_at IS NULL
            WHERE ps.deleted_at IS NULL
            ORDER BY ps.created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }
}
