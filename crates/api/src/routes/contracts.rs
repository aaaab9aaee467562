//! Route definitions for contracts.
//!
//! Mounted at `/contracts` by `api_routes()`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::contracts;
use crate::state::AppState;

/// Contract routes.
///
/// ```text
/// GET    /                   -> list_contracts
/// POST   /                   -> create_contract
/// GET    /expiring           -> list_expiring
/// GET    /summary            -> summary
/// GET    /{id}               -> get_contract
/// PUT    /{id}               -> update_contract
/// POST   /{id}/signatures    -> record_signature
/// POST   /{id}/status        -> change_status
/// POST   /{id}/activate      -> activate
/// POST   /{id}/review        -> move_to_review
/// POST   /{id}/notify        -> notify_client
/// POST   /{id}/document      -> attach_document
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(contracts::list_contracts).post(contracts::create_contract),
        )
        .route("/expiring", get(contracts::list_expiring))
        .route("/summary", get(contracts::summary))
        .route(
            "/{id}",
            get(contracts::get_contract).put(contracts::update_contract),
        )
        .route("/{id}/signatures", post(contracts::record_signature))
        .route("/{id}/status", post(contracts::change_status))
        .route("/{id}/activate", post(contracts::activate))
        .route("/{id}/review", post(contracts::move_to_review))
        .route("/{id}/notify", post(contracts::notify_client))
        .route(
            "/{id}/document",
            post(contracts::attach_document).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}
