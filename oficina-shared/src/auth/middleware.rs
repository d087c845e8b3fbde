/// Session gate middleware for Axum
///
/// The gate sits in front of every protected route. It extracts the bearer
/// credential from the `Authorization` header, delegates to the
/// [`TokenService`](super::token::TokenService), and either forwards the
/// request with a [`CurrentUser`] extension attached or rejects it before any
/// handler runs.
///
/// The gate fails closed: a missing header is its own distinct rejection, and
/// every non-valid token outcome maps 1:1 to a distinct message. Nothing is
/// persisted and nothing downstream can observe a rejected request.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use axum::{middleware, routing::get, Extension, Router};
/// use oficina_shared::auth::middleware::{require_session, CurrentUser};
/// use oficina_shared::auth::token::TokenService;
///
/// async fn whoami(Extension(user): Extension<CurrentUser>) -> String {
///     format!("hello, {}", user.name)
/// }
///
/// let tokens = Arc::new(TokenService::new(b"a-signing-key-of-32-bytes-or-more"));
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn(require_session(tokens)));
/// ```
use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::token::{TokenOutcome, TokenService};

/// Identity of the authenticated caller, inserted into request extensions
///
/// The claimed user id is trusted on signature alone; it is not re-checked
/// against the store on each request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User id from the token's subject claim
    pub id: Uuid,

    /// Display name from the token
    pub name: String,
}

/// Rejection produced by the session gate
#[derive(Debug, PartialEq, Eq)]
pub enum GateError {
    /// No `Authorization` header on the request
    MissingCredential,

    /// Token was present but did not validate; carries the distinct
    /// per-outcome wording from [`TokenOutcome::rejection`]
    RejectedToken(&'static str),
}

impl GateError {
    /// Message sent to the client
    pub fn message(&self) -> &'static str {
        match self {
            GateError::MissingCredential => "authorization header is missing",
            GateError::RejectedToken(msg) => msg,
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, self.message()).into_response()
    }
}

/// Session gate middleware
///
/// Accepts the token either as `Bearer <token>` or as the raw header value.
/// On success the request gains a [`CurrentUser`] extension and continues
/// unchanged; on any failure the request stops here.
pub async fn session_gate(
    tokens: Arc<TokenService>,
    mut req: Request,
    next: Next,
) -> Result<Response, GateError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(GateError::MissingCredential)?;

    let token = auth_header.strip_prefix("Bearer ").unwrap_or(auth_header);

    match tokens.validate(token) {
        TokenOutcome::Valid(claims) => {
            req.extensions_mut().insert(CurrentUser {
                id: claims.sub,
                name: claims.name,
            });
            Ok(next.run(req).await)
        }
        outcome => {
            tracing::debug!(rejection = outcome.rejection(), "session gate rejected request");
            // rejection() is Some for every non-Valid outcome
            Err(GateError::RejectedToken(
                outcome.rejection().unwrap_or("could not process session token"),
            ))
        }
    }
}

/// Creates a session gate closure for `axum::middleware::from_fn`
///
/// Captures the token service so routers can layer the gate without a
/// shared-state extractor.
pub fn require_session(
    tokens: Arc<TokenService>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<Response, GateError>> + Send>,
> + Clone {
    move |req, next| {
        let tokens = tokens.clone();
        Box::pin(session_gate(tokens, req, next))
    }
}
