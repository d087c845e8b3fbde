/// Market quotes proxy
///
/// Pass-through to the upstream finance quotes API. The upstream key is
/// appended server-side from configuration and never reaches the client.
/// Responses carry a one-hour private cache hint so browsers stop hammering
/// the upstream.
///
/// # Endpoint
///
/// - `GET /v1/finance` (session gate applied)
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// Fetches current quotes from the upstream API
///
/// # Errors
///
/// - `503 Service Unavailable`: no upstream key configured
/// - `502 Bad Gateway`: upstream request or body parse failed
pub async fn quotes(State(state): State<AppState>) -> ApiResult<Response> {
    let key = state.config.finance.key.as_deref().ok_or_else(|| {
        ApiError::ServiceUnavailable("finance quotes are not configured".to_string())
    })?;

    let upstream = state
        .http
        .get(&state.config.finance.url)
        .query(&[("key", key)])
        .send()
        .await?;

    // reqwest and axum sit on different http versions; carry the code over
    let status = StatusCode::from_u16(upstream.status().as_u16())
        .unwrap_or(StatusCode::BAD_GATEWAY);

    let body: serde_json::Value = upstream.json().await?;

    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("max-age=3600, private"),
    );

    Ok(response)
}
