/// Common test utilities for integration tests
///
/// Provides shared infrastructure:
/// - schema setup against the `DATABASE_URL` database
/// - test user creation with a unique email
/// - session token generation
/// - a built router ready for `tower::ServiceExt::oneshot`
///
/// DB-backed tests skip themselves when `DATABASE_URL` is not set.
use oficina_api::app::{build_router, AppState};
use oficina_api::config::{ApiConfig, AuthConfig, Config, DatabaseConfig, FinanceConfig};
use oficina_shared::models::user::{CreateUser, User};
use sqlx::PgPool;
use uuid::Uuid;

/// Statements bringing a fresh database up to the expected schema
const SCHEMA: &[&str] = &[
    "CREATE EXTENSION IF NOT EXISTS pgcrypto",
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL UNIQUE,
        password_hash VARCHAR(255) NOT NULL,
        user_type INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        deleted_at TIMESTAMPTZ,
        last_login_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        id UUID PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        cnpj VARCHAR(18) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        deleted_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id UUID PRIMARY KEY,
        customer VARCHAR(255) NOT NULL,
        description TEXT NOT NULL,
        payment VARCHAR(64) NOT NULL,
        user_id UUID NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        deleted_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS order_items (
        id UUID PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        price INTEGER NOT NULL,
        order_id UUID NOT NULL REFERENCES orders(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        deleted_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pending_services (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        description TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        deleted_at TIMESTAMPTZ
    )
    "#,
];

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub user: User,
    pub password: String,
    pub token: String,
}

impl TestContext {
    /// Creates a test context, or `None` when `DATABASE_URL` is unset
    pub async fn try_new() -> anyhow::Result<Option<Self>> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set; skipping DB-backed test");
            return Ok(None);
        };

        let db = PgPool::connect(&url).await?;
        for statement in SCHEMA {
            sqlx::query(statement).execute(&db).await?;
        }

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url,
                max_connections: 5,
            },
            auth: AuthConfig {
                signing_key: vec![7u8; 32],
            },
            finance: FinanceConfig {
                url: "https://api.hgbrasil.com/finance".to_string(),
                key: None,
            },
        };

        let password = "correct-horse-battery".to_string();
        let user = User::create(
            &db,
            CreateUser {
                name: "Test User".to_string(),
                email: format!("test-{}@example.com", Uuid::new_v4()),
                password: password.clone(),
                user_type: 0,
            },
        )
        .await?;

        let state = AppState::new(db.clone(), config);
        let token = state.tokens.issue(user.id, &user.name)?;
        let app = build_router(state);

        Ok(Some(TestContext {
            db,
            app,
            user,
            password,
            token,
        }))
    }

    /// Returns the authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Removes rows created by this context
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM pending_services WHERE user_id = $1")
            .bind(self.user.id)
            .execute(&self.db)
            .await?;
        sqlx::query(
            "DELETE FROM order_items WHERE order_id IN (SELECT id FROM orders WHERE user_id = $1)",
        )
        .bind(self.user.id)
        .execute(&self.db)
        .await?;
        sqlx::query("DELETE FROM orders WHERE user_id = $1")
            .bind(self.user.id)
            .execute(&self.db)
            .await?;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.user.id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
