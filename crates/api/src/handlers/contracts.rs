//! Handlers for the `/contracts` resource.
//!
//! Every handler locks the shared [`ContractEngine`](vendorhub_engine::ContractEngine)
//! for the duration of the call, so mutations are applied one at a time.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use vendorhub_core::contract::{
    ContractFilter, ContractPatch, ContractStatus, ContractType, NewContract, SignatureParty,
    CONTRACT_ENTITY,
};
use vendorhub_core::error::CoreError;
use vendorhub_core::storage::DocumentUpload;

use crate::error::{AppError, AppResult};
use crate::middleware::actor::Actor;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the document bytes.
const DOCUMENT_FIELD: &str = "file";

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Request body for `POST /contracts/{id}/signatures`.
#[derive(Debug, Deserialize)]
pub struct SignatureRequest {
    pub party: String,
}

/// Request body for `POST /contracts/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Query params
// ---------------------------------------------------------------------------

/// Query parameters for the list view. Absent parameters match everything.
#[derive(Debug, Default, Deserialize)]
pub struct ContractListParams {
    pub status: Option<String>,
    pub vendor: Option<String>,
    #[serde(rename = "type")]
    pub contract_type: Option<String>,
    pub search: Option<String>,
}

impl ContractListParams {
    fn into_filter(self) -> Result<ContractFilter, CoreError> {
        Ok(ContractFilter {
            status: parse_opt::<ContractStatus>(self.status)?,
            vendor: self.vendor.filter(|v| !v.trim().is_empty()),
            contract_type: parse_opt::<ContractType>(self.contract_type)?,
            search: self.search,
        })
    }
}

/// Query parameters for `GET /contracts/expiring`.
#[derive(Debug, Default, Deserialize)]
pub struct ExpiringParams {
    pub within_days: Option<i64>,
    pub status: Option<String>,
}

fn parse_opt<T>(raw: Option<String>) -> Result<Option<T>, CoreError>
where
    T: std::str::FromStr<Err = CoreError>,
{
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().parse())
        .transpose()
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /contracts
///
/// List contracts, newest first, narrowed by the optional filters.
pub async fn list_contracts(
    State(state): State<AppState>,
    Query(params): Query<ContractListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = params.into_filter()?;
    let engine = state.engine.lock().await;
    let contracts: Vec<_> = filter.apply(engine.contracts()).into_iter().cloned().collect();

    Ok(Json(DataResponse { data: contracts }))
}

/// GET /contracts/{id}
pub async fn get_contract(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let engine = state.engine.lock().await;
    let contract = engine.get(&id).cloned().ok_or_else(|| CoreError::NotFound {
        entity: CONTRACT_ENTITY,
        id,
    })?;

    Ok(Json(DataResponse { data: contract }))
}

/// GET /contracts/expiring
///
/// Contracts ending within the window (default from config) whose status
/// matches (default `Active`).
pub async fn list_expiring(
    State(state): State<AppState>,
    Query(params): Query<ExpiringParams>,
) -> AppResult<impl IntoResponse> {
    let within_days = params
        .within_days
        .unwrap_or(state.config.expiry_window_days);
    if within_days < 0 {
        return Err(AppError::BadRequest(
            "within_days must not be negative".into(),
        ));
    }
    let status = parse_opt::<ContractStatus>(params.status)?.unwrap_or(ContractStatus::Active);

    let engine = state.engine.lock().await;
    let expiring = engine.list_expiring(within_days, status);

    Ok(Json(DataResponse { data: expiring }))
}

/// GET /contracts/summary
pub async fn summary(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let engine = state.engine.lock().await;
    Ok(Json(DataResponse {
        data: engine.summary(),
    }))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /contracts
///
/// Create a contract from the form fields. Returns 201 with the stored record.
pub async fn create_contract(
    State(state): State<AppState>,
    actor: Actor,
    Json(input): Json<NewContract>,
) -> AppResult<impl IntoResponse> {
    let mut engine = state.engine.lock().await;
    let contract = engine.create_contract(input, actor.as_str()).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: contract })))
}

/// PUT /contracts/{id}
///
/// Apply a partial update. Omitted fields keep their stored values.
pub async fn update_contract(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(patch): Json<ContractPatch>,
) -> AppResult<impl IntoResponse> {
    let mut engine = state.engine.lock().await;
    let contract = engine.update_contract(&id, patch, actor.as_str()).await?;

    Ok(Json(DataResponse { data: contract }))
}

/// POST /contracts/{id}/signatures
///
/// Record that `party` (`company` or `vendor`) has signed.
pub async fn record_signature(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(body): Json<SignatureRequest>,
) -> AppResult<impl IntoResponse> {
    let party: SignatureParty = body.party.trim().parse()?;
    let mut engine = state.engine.lock().await;
    let contract = engine.record_signature(&id, party, actor.as_str()).await?;

    Ok(Json(DataResponse { data: contract }))
}

/// POST /contracts/{id}/status
///
/// Operator override of the status.
pub async fn change_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(body): Json<StatusRequest>,
) -> AppResult<impl IntoResponse> {
    let status: ContractStatus = body.status.trim().parse()?;
    let mut engine = state.engine.lock().await;
    let contract = engine.change_status(&id, status, actor.as_str()).await?;

    Ok(Json(DataResponse { data: contract }))
}

/// POST /contracts/{id}/activate
pub async fn activate(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let mut engine = state.engine.lock().await;
    let contract = engine.activate(&id, actor.as_str()).await?;

    Ok(Json(DataResponse { data: contract }))
}

/// POST /contracts/{id}/review
pub async fn move_to_review(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let mut engine = state.engine.lock().await;
    let contract = engine.move_to_review(&id, actor.as_str()).await?;

    Ok(Json(DataResponse { data: contract }))
}

/// POST /contracts/{id}/notify
///
/// "Notify Client" action. Returns 202 with the dispatched event; delivery
/// happens in the background and its failures are only logged.
pub async fn notify_client(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let engine = state.engine.lock().await;
    let event = engine.notify_client(&id, actor.as_str())?;

    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: event })))
}

/// POST /contracts/{id}/document
///
/// Accepts a multipart form with a required `file` field. When the document
/// store is unavailable the response still succeeds with
/// `persistent: false` and a session-only URL.
pub async fn attach_document(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut upload: Option<DocumentUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(DOCUMENT_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("document.pdf").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let mut doc = DocumentUpload::new(file_name, bytes.to_vec());
        doc.content_type = content_type;
        upload = Some(doc);
    }

    let upload =
        upload.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    if upload.bytes.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    let mut engine = state.engine.lock().await;
    let stored = engine.attach_document(&id, upload, actor.as_str()).await?;

    Ok(Json(DataResponse { data: stored }))
}
