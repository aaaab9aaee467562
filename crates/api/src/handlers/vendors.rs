use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /vendors
///
/// Sorted, de-duplicated vendor names for the contract form.
pub async fn list_vendors(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let names = state.vendors.vendor_names().await?;
    tracing::debug!(count = names.len(), "Listed vendors");
    Ok(Json(DataResponse { data: names }))
}
