/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/login` - exchange credentials for a session token
/// - `GET /v1/auth/validate` - probe a token's validity (client UX helper)
use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, http::header, http::HeaderMap, Json};
use oficina_shared::{auth::token::TokenOutcome, models::user::User};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (compared in the store, never hashed here)
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Signed session token, valid for 24 hours
    pub token: String,

    /// Display name of the logged-in user
    pub user_name: String,

    /// Email of the logged-in user
    pub user_email: String,
}

/// Token probe response
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    /// Whether the supplied token validated
    pub valid: bool,

    /// Outcome wording, identical to the gate's rejection messages
    pub message: String,

    /// Claimed user id, present only for valid tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,

    /// Claimed display name, present only for valid tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Login endpoint
///
/// Verifies the credentials against the store (the password hash comparison
/// runs in-database) and returns a signed session token on success. Failure
/// is an explicit 401 with no token; the response never says which of the two
/// credentials was wrong.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "maria@example.com",
///   "password": "s3cret"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: malformed email
/// - `401 Unauthorized`: credentials did not match
/// - `500 Internal Server Error`: store or signing failure
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    // Validate request shape
    req.validate().map_err(|e| {
        let errors: Vec<ValidationErrorDetail> = e
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        ApiError::ValidationError(errors)
    })?;

    // Both predicates constrain the same fetch; no row means bad credentials
    let user = User::find_by_credentials(&state.db, &req.email, &req.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    User::update_last_login(&state.db, user.id).await?;

    let token = state.tokens.issue(user.id, &user.name)?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse {
        token,
        user_name: user.name,
        user_email: user.email,
    }))
}

/// Token probe endpoint
///
/// Validates the bearer token from the `Authorization` header and reports the
/// outcome with the same distinct wording the gate uses. Unlike the gate this
/// route always answers 200 for a present token, so clients can inspect why a
/// token stopped working.
///
/// # Errors
///
/// - `401 Unauthorized`: no `Authorization` header at all
pub async fn validate(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ValidateResponse>> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("authorization header is missing".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").unwrap_or(auth_header);

    let response = match state.tokens.validate(token) {
        TokenOutcome::Valid(claims) => ValidateResponse {
            valid: true,
            message: "session token is valid".to_string(),
            user_id: Some(claims.sub),
            name: Some(claims.name),
        },
        outcome => ValidateResponse {
            valid: false,
            message: outcome
                .rejection()
                .unwrap_or("could not process session token")
                .to_string(),
            user_id: None,
            name: None,
        },
    };

    Ok(Json(response))
}
