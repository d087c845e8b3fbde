/// Report endpoints
///
/// Read-only denormalized projections; both sit behind the session gate.
///
/// # Endpoints
///
/// - `GET /v1/reports/orders` - orders with summed line-item totals
/// - `GET /v1/reports/pending-services` - pending services with requester name
use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use oficina_shared::auth::middleware::CurrentUser;
use oficina_shared::reports::{OrderSummary, PendingServiceSummary};

/// Orders-with-total listing
///
/// One row per live order with `total` summed over its live line items.
/// Orders without items appear with `total = 0`.
///
/// A failed query is a failure response; there is no partial or stale data.
pub async fn list_order_totals(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<OrderSummary>>> {
    tracing::debug!(user_id = %user.id, "listing order totals");
    let rows = OrderSummary::list(&state.db).await?;
    Ok(Json(rows))
}

/// Pending-services listing
///
/// One row per live pending service with the requester's display name;
/// `user_name` is null when the owning user is missing or deleted.
pub async fn list_pending_services(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<PendingServiceSummary>>> {
    tracing::debug!(user_id = %user.id, "listing pending services");
    let rows = PendingServiceSummary::list(&state.db).await?;
    Ok(Json(rows))
}
