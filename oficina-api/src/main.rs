//! # Oficina API Server
//!
//! REST backend for the oficina business-management application: customers,
//! users, orders with line items, and pending services.
//!
//! Startup is fail-fast: a missing or malformed signing secret or an
//! unreachable database aborts the process before any route is served.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p oficina-api
//! ```

use oficina_api::{
    app::{build_router, AppState},
    config::Config,
};
use oficina_shared::db::pool::{create_pool, DatabaseConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oficina_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Oficina API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Fatal on missing DATABASE_URL or missing/malformed JWT_SECRET
    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
