//! Integration tests for the `/api/v1/contracts` and `/api/v1/vendors` endpoints.

mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use common::{
    body_json, build_test_app, contract_payload, create_contract, get, post_empty, post_file,
    post_json, put_json, send_json,
};
use vendorhub_engine::memory::MemoryDocumentStore;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_201_with_generated_id_and_audit_entry() {
    let app = build_test_app();
    let response = send_json(
        app.router.clone(),
        Method::POST,
        "/api/v1/contracts",
        contract_payload(),
        Some("Dana Lee"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let data = &json["data"];

    assert!(data["id"].as_str().unwrap().starts_with("contract-"));
    assert_eq!(data["status"], "Draft");
    assert_eq!(data["type"], "SOW");
    assert_eq!(data["auditLog"].as_array().unwrap().len(), 1);
    assert_eq!(data["auditLog"][0]["action"], "Contract Created");
    assert_eq!(data["auditLog"][0]["user"], "Dana Lee");
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn create_without_actor_header_uses_default_user() {
    let app = build_test_app();
    let data = create_contract(app.router.clone(), contract_payload()).await;
    assert_eq!(data["auditLog"][0]["user"], "Current User");
}

#[tokio::test]
async fn create_with_both_signatures_and_past_start_is_active() {
    let app = build_test_app();
    let mut payload = contract_payload();
    payload["companySigned"] = true.into();
    payload["vendorSigned"] = true.into();

    let data = create_contract(app.router.clone(), payload).await;
    assert_eq!(data["status"], "Active");
}

#[tokio::test]
async fn create_with_missing_vendor_returns_400_and_persists_nothing() {
    let app = build_test_app();
    let mut payload = contract_payload();
    payload["vendorName"] = "".into();

    let response = post_json(app.router.clone(), "/api/v1/contracts", payload).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Please select a vendor");
    assert_eq!(json["title"], "Invalid contract details");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn create_with_start_after_end_returns_400() {
    let app = build_test_app();
    let mut payload = contract_payload();
    payload["startDate"] = "2030-01-01".into();
    payload["endDate"] = "2029-01-01".into();

    let response = post_json(app.router.clone(), "/api/v1/contracts", payload).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Start date cannot be after end date");
}

#[tokio::test]
async fn create_when_store_rejects_write_returns_502() {
    let app = build_test_app();
    app.store.set_fail_writes(true);

    let response = post_json(app.router.clone(), "/api/v1/contracts", contract_payload()).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "STORAGE_ERROR");
    assert_eq!(json["title"], "Failed to Save Contract");

    let list = body_json(get(app.router.clone(), "/api/v1/contracts").await).await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Read and filter
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_returns_created_contract() {
    let app = build_test_app();
    let created = create_contract(app.router.clone(), contract_payload()).await;
    let id = created["id"].as_str().unwrap();

    let response = get(app.router.clone(), &format!("/api/v1/contracts/{id}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], created);
}

#[tokio::test]
async fn get_unknown_contract_returns_404() {
    let app = build_test_app();
    let response = get(app.router.clone(), "/api/v1/contracts/contract-missing").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Contract with id contract-missing not found");
}

#[tokio::test]
async fn list_filters_by_type_and_search() {
    let app = build_test_app();
    create_contract(app.router.clone(), contract_payload()).await;

    let mut msa = contract_payload();
    msa["type"] = "MSA".into();
    msa["vendorName"] = "Globex".into();
    msa["title"] = "Master services agreement".into();
    create_contract(app.router.clone(), msa).await;

    let all = body_json(get(app.router.clone(), "/api/v1/contracts").await).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);

    let sows = body_json(get(app.router.clone(), "/api/v1/contracts?type=SOW").await).await;
    let sows = sows["data"].as_array().unwrap();
    assert_eq!(sows.len(), 1);
    assert_eq!(sows[0]["vendorName"], "Acme Staffing");

    let found = body_json(get(app.router.clone(), "/api/v1/contracts?search=globex").await).await;
    assert_eq!(found["data"].as_array().unwrap().len(), 1);

    let review = body_json(
        get(app.router.clone(), "/api/v1/contracts?status=Under%20Review").await,
    )
    .await;
    assert!(review["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn list_with_unknown_status_returns_400() {
    let app = build_test_app();
    let response = get(app.router.clone(), "/api/v1/contracts?status=Archived").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Signatures and status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn signing_by_both_parties_activates_contract() {
    let app = build_test_app();
    let created = create_contract(app.router.clone(), contract_payload()).await;
    let id = created["id"].as_str().unwrap();
    let uri = format!("/api/v1/contracts/{id}/signatures");

    let response = post_json(
        app.router.clone(),
        &uri,
        serde_json::json!({ "party": "vendor" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let after_vendor = body_json(response).await;
    assert_eq!(after_vendor["data"]["status"], "Draft");
    assert_eq!(after_vendor["data"]["vendorSigned"], true);

    let after_company = body_json(
        post_json(
            app.router.clone(),
            &uri,
            serde_json::json!({ "party": "company" }),
        )
        .await,
    )
    .await;
    let data = &after_company["data"];
    assert_eq!(data["status"], "Active");

    let actions: Vec<_> = data["auditLog"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        actions,
        vec!["Contract Created", "Vendor Signed", "Company Signed"]
    );
}

#[tokio::test]
async fn unknown_signature_party_returns_400() {
    let app = build_test_app();
    let created = create_contract(app.router.clone(), contract_payload()).await;
    let id = created["id"].as_str().unwrap();

    let response = post_json(
        app.router.clone(),
        &format!("/api/v1/contracts/{id}/signatures"),
        serde_json::json!({ "party": "witness" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_override_records_audit_entry() {
    let app = build_test_app();
    let created = create_contract(app.router.clone(), contract_payload()).await;
    let id = created["id"].as_str().unwrap();

    let response = send_json(
        app.router.clone(),
        Method::POST,
        &format!("/api/v1/contracts/{id}/status"),
        serde_json::json!({ "status": "Expired" }),
        Some("Ops Admin"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "Expired");
    let last = json["data"]["auditLog"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["action"], "Status changed to Expired");
    assert_eq!(last["user"], "Ops Admin");
}

#[tokio::test]
async fn review_then_activate_requires_signed_status() {
    let app = build_test_app();
    let created = create_contract(app.router.clone(), contract_payload()).await;
    let id = created["id"].as_str().unwrap();

    let review = post_empty(app.router.clone(), &format!("/api/v1/contracts/{id}/review")).await;
    assert_eq!(review.status(), StatusCode::OK);
    assert_eq!(body_json(review).await["data"]["status"], "Under Review");

    let rejected =
        post_empty(app.router.clone(), &format!("/api/v1/contracts/{id}/activate")).await;
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

    post_json(
        app.router.clone(),
        &format!("/api/v1/contracts/{id}/status"),
        serde_json::json!({ "status": "Signed" }),
    )
    .await;
    let activated =
        post_empty(app.router.clone(), &format!("/api/v1/contracts/{id}/activate")).await;
    assert_eq!(activated.status(), StatusCode::OK);
    assert_eq!(body_json(activated).await["data"]["status"], "Active");
}

#[tokio::test]
async fn notify_client_returns_202_and_publishes_event() {
    let app = build_test_app();
    let created = create_contract(app.router.clone(), contract_payload()).await;
    let id = created["id"].as_str().unwrap();
    let mut events = app.notifier.subscribe();

    let response = send_json(
        app.router.clone(),
        Method::POST,
        &format!("/api/v1/contracts/{id}/notify"),
        serde_json::json!({}),
        Some("Ops Admin"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["kind"], "client_notified");
    assert_eq!(json["data"]["contractId"], id);
    assert_eq!(json["data"]["actor"], "Ops Admin");

    let event = events.recv().await.unwrap();
    assert_eq!(event.contract_id, id);

    let stored = body_json(get(app.router.clone(), &format!("/api/v1/contracts/{id}")).await).await;
    assert_eq!(stored["data"], created);
}

#[tokio::test]
async fn notify_client_unknown_contract_returns_404() {
    let app = build_test_app();
    let response = post_empty(app.router.clone(), "/api/v1/contracts/contract-missing/notify").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_merges_fields_and_appends_audit_entry() {
    let app = build_test_app();
    let created = create_contract(app.router.clone(), contract_payload()).await;
    let id = created["id"].as_str().unwrap();

    let response = put_json(
        app.router.clone(),
        &format!("/api/v1/contracts/{id}"),
        serde_json::json!({ "value": 52000.0, "paymentTerms": "Net 45" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["value"], 52000.0);
    assert_eq!(data["paymentTerms"], "Net 45");
    assert_eq!(data["title"], created["title"]);
    assert_eq!(data["createdAt"], created["createdAt"]);
    assert_eq!(data["auditLog"].as_array().unwrap().len(), 2);
    assert_eq!(data["auditLog"][1]["action"], "Contract Updated");
}

#[tokio::test]
async fn update_with_negative_value_returns_400_and_keeps_record() {
    let app = build_test_app();
    let created = create_contract(app.router.clone(), contract_payload()).await;
    let id = created["id"].as_str().unwrap();

    let response = put_json(
        app.router.clone(),
        &format!("/api/v1/contracts/{id}"),
        serde_json::json!({ "value": -1.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let stored = body_json(get(app.router.clone(), &format!("/api/v1/contracts/{id}")).await).await;
    assert_eq!(stored["data"], created);
}

#[tokio::test]
async fn update_unknown_contract_returns_404() {
    let app = build_test_app();
    let response = put_json(
        app.router.clone(),
        "/api/v1/contracts/contract-missing",
        serde_json::json!({ "title": "x" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[tokio::test]
async fn attach_document_stores_reference() {
    let app = build_test_app();
    let created = create_contract(app.router.clone(), contract_payload()).await;
    let id = created["id"].as_str().unwrap();

    let response = post_file(
        app.router.clone(),
        &format!("/api/v1/contracts/{id}/document"),
        "file",
        "sow.pdf",
        b"%PDF-1.7 test",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["fileName"], "sow.pdf");
    assert_eq!(json["data"]["persistent"], true);
    assert_eq!(app.documents.file_count().await, 1);

    let stored = body_json(get(app.router.clone(), &format!("/api/v1/contracts/{id}")).await).await;
    assert_eq!(stored["data"]["document"]["fileName"], "sow.pdf");
    let last = stored["data"]["auditLog"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["action"], "Document Attached");
}

#[tokio::test]
async fn attach_document_falls_back_to_session_reference() {
    let app = common::build_test_app_with_documents(MemoryDocumentStore::failing());
    let created = create_contract(app.router.clone(), contract_payload()).await;
    let id = created["id"].as_str().unwrap();

    let response = post_file(
        app.router.clone(),
        &format!("/api/v1/contracts/{id}/document"),
        "file",
        "sow.pdf",
        b"%PDF-1.7 test",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["persistent"], false);
    assert!(json["data"]["url"].as_str().unwrap().starts_with("session://"));
}

#[tokio::test]
async fn attach_document_without_file_field_returns_400() {
    let app = build_test_app();
    let created = create_contract(app.router.clone(), contract_payload()).await;
    let id = created["id"].as_str().unwrap();

    let response = post_file(
        app.router.clone(),
        &format!("/api/v1/contracts/{id}/document"),
        "attachment",
        "sow.pdf",
        b"%PDF",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Expiring and summary
// ---------------------------------------------------------------------------

#[tokio::test]
async fn expiring_lists_active_contracts_inside_window() {
    let app = build_test_app();
    let today = Utc::now().date_naive();

    let mut soon = contract_payload();
    soon["title"] = "Ends soon".into();
    soon["endDate"] = (today + Duration::days(10)).to_string().into();
    soon["companySigned"] = true.into();
    soon["vendorSigned"] = true.into();
    create_contract(app.router.clone(), soon).await;

    let mut later = contract_payload();
    later["title"] = "Ends later".into();
    later["endDate"] = (today + Duration::days(90)).to_string().into();
    later["companySigned"] = true.into();
    later["vendorSigned"] = true.into();
    create_contract(app.router.clone(), later).await;

    let json = body_json(get(app.router.clone(), "/api/v1/contracts/expiring").await).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], "Ends soon");

    let wide = body_json(
        get(app.router.clone(), "/api/v1/contracts/expiring?within_days=120").await,
    )
    .await;
    assert_eq!(wide["data"].as_array().unwrap().len(), 2);

    let drafts = body_json(
        get(app.router.clone(), "/api/v1/contracts/expiring?status=Draft").await,
    )
    .await;
    assert!(drafts["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn expiring_with_negative_window_returns_400() {
    let app = build_test_app();
    let response = get(app.router.clone(), "/api/v1/contracts/expiring?within_days=-5").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn summary_counts_by_status() {
    let app = build_test_app();
    create_contract(app.router.clone(), contract_payload()).await;

    let mut active = contract_payload();
    active["value"] = 2000.0.into();
    active["companySigned"] = true.into();
    active["vendorSigned"] = true.into();
    create_contract(app.router.clone(), active).await;

    let json = body_json(get(app.router.clone(), "/api/v1/contracts/summary").await).await;
    let data = &json["data"];
    assert_eq!(data["total"], 2);
    assert_eq!(data["byStatus"]["Draft"], 1);
    assert_eq!(data["byStatus"]["Active"], 1);
    assert_eq!(data["byStatus"]["Expired"], 0);
    assert_eq!(data["totalValue"], 50000.0);
    assert_eq!(data["activeValue"], 2000.0);
    assert_eq!(data["byExpiry"]["active"], 2);
    assert_eq!(data["byExpiry"]["expired"], 0);
    assert_eq!(data["needsAttention"], 0);
}

// ---------------------------------------------------------------------------
// Vendors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn vendors_are_sorted_and_deduplicated() {
    let app = build_test_app();
    let json = body_json(get(app.router.clone(), "/api/v1/vendors").await).await;
    assert_eq!(json["data"], serde_json::json!(["Acme Staffing", "Globex"]));
}
