/// User model and store operations
///
/// Users are the accounts that log in and own pending services. Records are
/// soft-deleted: a `deleted_at` tombstone hides them from every query here
/// without physically removing the row.
///
/// Password handling is delegated to the store. Hashes are produced and
/// compared with pgcrypto's `crypt()`, so plaintext passwords cross the wire
/// to PostgreSQL exactly once per operation and the application never computes
/// a hash itself.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     user_type INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ,
///     last_login_at TIMESTAMPTZ
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user id, generated server-side at creation
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address, unique across live users
    pub email: String,

    /// pgcrypto `crypt()` hash; never serialized out
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Account type discriminator
    pub user_type: i32,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// Soft-delete tombstone; None for live accounts
    pub deleted_at: Option<DateTime<Utc>>,

    /// When the user last logged in
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for creating a user
///
/// Carries the plaintext password; the store hashes it on insert.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub user_type: i32,
}

impl User {
    /// Creates a user, hashing the password in the store
    ///
    /// The id is a fresh v4 UUID generated here; client-supplied ids are
    /// never accepted.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, user_type)
            VALUES ($1, $2, $3, crypt($4, gen_salt('bf')), $5)
            RETURNING id, name, email, password_hash, user_type,
                      created_at, updated_at, deleted_at, last_login_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.name)
        .bind(data.email)
        .bind(data.password)
        .bind(data.user_type)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a live user by id
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, user_type,
                   created_at, updated_at, deleted_at, last_login_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a live user matching both email and password
    ///
    /// The hash comparison runs inside the store via `crypt()`. Both
    /// predicates constrain the same fetch, so a row comes back only when the
    /// credentials actually match; there is no fetch-then-count step.
    pub async fn find_by_credentials(
        pool: &PgPool,
        email: &str,
        password: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, user_type,
                   created_at, updated_at, deleted_at, last_login_at
            FROM users
            WHERE email = $1
              AND password_hash = crypt($2, password_hash)
              AND deleted_at IS NULL
            "#,
        )
        .bind(email)
        .bind(password)
        .fetch_optional(pool)
        .await
    }

    /// Stamps `last_login_at` after a successful login
    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET last_login_at = NOW(), updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Soft-deletes a user by setting the tombstone
    pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
