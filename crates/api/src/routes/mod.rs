pub mod contracts;
pub mod health;
pub mod vendors;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /contracts                          list (?status, vendor, type, search), create
/// /contracts/expiring                 expiring soon (?within_days, status)
/// /contracts/summary                  dashboard counts and totals
/// /contracts/{id}                     get, update
/// /contracts/{id}/signatures          record signature (POST)
/// /contracts/{id}/status              status override (POST)
/// /contracts/{id}/activate            activate a signed contract (POST)
/// /contracts/{id}/review              move to review (POST)
/// /contracts/{id}/notify              notify client (POST)
/// /contracts/{id}/document            attach document, multipart (POST)
///
/// /vendors                            vendor names
/// ```
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .nest("/contracts", contracts::router(max_upload_bytes))
        .nest("/vendors", vendors::router())
}
