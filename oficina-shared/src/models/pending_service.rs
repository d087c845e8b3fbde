/// Pending service model
///
/// A pending service is a piece of work waiting on a user. The reports layer
/// joins it to its owning user to show who requested it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE pending_services (
///     id UUID PRIMARY KEY,
///     user_id UUID NOT NULL,
///     description TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Pending service record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PendingService {
    pub id: Uuid,

    /// Owning user; not a hard foreign key, so the reports join tolerates
    /// a missing or soft-deleted user
    pub user_id: Uuid,

    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Input for creating a pending service
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePendingService {
    pub user_id: Uuid,
    pub description: String,
}

impl PendingService {
    /// Creates a pending service with a server-generated id
    pub async fn create(pool: &PgPool, data: CreatePendingService) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, PendingService>(
            r#"
            INSERT INTO pending_services (id, user_id, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, description, created_at, updated_at, deleted_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.description)
        .fetch_one(pool)
        .await
    }

    /// Soft-deletes a pending service
    pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE pending_services SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
