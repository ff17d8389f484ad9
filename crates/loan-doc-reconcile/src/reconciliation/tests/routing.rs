use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::reconciliation::RulesetCatalog;

fn post_json(uri: &str, body: &Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn reconcile_route_returns_comparison_result() {
    let body = json!({
        "extractedData": {
            "name": "นายสมชาย ใจดี",
            "citizenId": "1-2345-67890-12-3",
            "birthDate": "01/05/2540",
        },
        "profileData": {
            "name": "สมชาย ใจดี",
            "citizenId": "1234567890123",
            "birthDate": { "_seconds": 862419600, "_nanoseconds": 0 },
        },
        "ruleset": [
            { "extractedKey": "name", "profileKey": "name", "label": "Name", "comparisonKind": "fuzzyName" },
            { "extractedKey": "citizenId", "profileKey": "citizenId", "label": "Citizen ID", "comparisonKind": "exact", "required": true },
            { "extractedKey": "birthDate", "profileKey": "birthDate", "label": "Birth date", "comparisonKind": "date" },
        ],
    });

    let response = router()
        .oneshot(post_json("/api/v1/reconcile", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("matchStatus"), Some(&json!("full_match")));
    assert_eq!(
        payload.pointer("/comparisonDetails/fieldsMatched"),
        Some(&json!(3))
    );
    assert_eq!(payload.get("matchPercentage"), Some(&json!(100)));
}

#[tokio::test]
async fn reconcile_route_reports_missing_profile_in_body() {
    let body = json!({
        "extractedData": { "name": "สมชาย" },
        "profileData": null,
        "ruleset": [],
    });

    let response = router()
        .oneshot(post_json("/api/v1/reconcile", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("matchStatus"), Some(&json!("no_profile_data")));
}

#[tokio::test]
async fn reconcile_route_rejects_unknown_comparison_kind() {
    let body = json!({
        "extractedData": {},
        "profileData": {},
        "ruleset": [
            { "extractedKey": "name", "profileKey": "name", "label": "Name", "comparisonKind": "phonetic" },
        ],
    });

    let response = router()
        .oneshot(post_json("/api/v1/reconcile", &body))
        .await
        .expect("route executes");

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn verify_route_returns_unprocessable_for_unknown_category() {
    let body = json!({ "category": "payslip", "extractedData": {} });

    let response = router()
        .oneshot(post_json("/api/v1/documents/verify", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("category"), Some(&json!("payslip")));
}

#[tokio::test]
async fn verify_route_accepts_explicit_today() {
    let body = json!({
        "documentId": "inc-1",
        "category": "income_certificate_father",
        "extractedData": serde_json::to_value(father_income_extraction()).unwrap(),
        "profiles": serde_json::to_value(profiles()).unwrap(),
        "today": "2024-03-01",
    });

    let response = router()
        .oneshot(post_json("/api/v1/documents/verify", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("documentId"), Some(&json!("inc-1")));
    assert_eq!(payload.get("role"), Some(&json!("father")));
    assert_eq!(payload.pointer("/documentAge/ageInDays"), Some(&json!(46)));
    assert_eq!(payload.pointer("/documentAge/isValid"), Some(&json!(true)));
}

#[tokio::test]
async fn verify_batch_route_counts_failures() {
    let body = json!({
        "today": "2024-03-01",
        "documents": [
            { "documentId": "a", "category": "payslip" },
            {
                "documentId": "b",
                "category": "id_card_father",
                "extractedData": { "name": "นายสมชาย ใจดี" },
                "profiles": { "father": { "name": "สมชาย ใจดี" } },
            },
        ],
    });

    let response = router()
        .oneshot(post_json("/api/v1/documents/verify-batch", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("succeeded"), Some(&json!(1)));
    assert_eq!(payload.get("failed"), Some(&json!(1)));
    assert_eq!(payload.pointer("/items/0/success"), Some(&json!(false)));
}

#[tokio::test]
async fn catalog_route_lists_categories() {
    let response = router()
        .oneshot(
            axum::http::Request::get("/api/v1/catalog")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let categories = payload
        .get("categories")
        .and_then(Value::as_array)
        .expect("categories array");
    assert_eq!(categories.len(), RulesetCatalog::standard().len());
}
