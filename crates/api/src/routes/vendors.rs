use axum::routing::get;
use axum::Router;

use crate::handlers::vendors;
use crate::state::AppState;

/// Vendor routes, mounted at `/vendors`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(vendors::list_vendors))
}
