/// Application state and router builder
///
/// # Router layout
///
/// ```text
/// /
/// ├── /health                        # liveness + DB probe (public)
/// └── /v1/
///     ├── /auth/
///     │   ├── POST /login            # credentials -> session token (public)
///     │   └── GET  /validate         # token probe (public)
///     ├── /reports/                  # session gate applied
///     │   ├── GET /orders            # orders with line-item totals
///     │   └── GET /pending-services  # pending services with requester name
///     └── GET /finance               # market quotes proxy (session gate)
/// ```
///
/// The session gate is layered onto the protected subtree only; rejected
/// requests stop at the gate and never reach a handler.
use crate::config::Config;
use axum::{
    middleware,
    routing::get,
    routing::post,
    Router,
};
use oficina_shared::auth::{middleware::require_session, token::TokenService};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. The token
/// service and configuration are behind `Arc` so the clone is cheap, and the
/// signing key lives only inside the token service and config, with no
/// ambient globals.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Session token service (issues and validates)
    pub tokens: Arc<TokenService>,

    /// HTTP client for upstream calls
    pub http: reqwest::Client,
}

impl AppState {
    /// Creates new application state
    ///
    /// Builds the token service from the already-decoded signing key in the
    /// configuration.
    pub fn new(db: PgPool, config: Config) -> Self {
        let tokens = Arc::new(TokenService::new(&config.auth.signing_key));
        Self {
            db,
            config: Arc::new(config),
            tokens,
            http: reqwest::Client::new(),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/validate", get(routes::auth::validate));

    // Protected routes: everything behind the session gate
    let protected_routes = Router::new()
        .route("/reports/orders", get(routes::reports::list_order_totals))
        .route(
            "/reports/pending-services",
            get(routes::reports::list_pending_services),
        )
        .route("/finance", get(routes::finance::quotes))
        .layer(middleware::from_fn(require_session(state.tokens.clone())));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
