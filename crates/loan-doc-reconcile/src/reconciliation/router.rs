use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::dates::local_today;
use super::domain::{ComparisonRuleset, ExtractedFieldSet, ProfileRecord};
use super::service::{DocumentVerificationRequest, DocumentVerificationService, VerificationError};

/// Router exposing the engine and the document verification service.
pub fn reconciliation_router(service: Arc<DocumentVerificationService>) -> Router {
    Router::new()
        .route("/api/v1/reconcile", post(reconcile_handler))
        .route("/api/v1/documents/verify", post(verify_handler))
        .route("/api/v1/documents/verify-batch", post(verify_batch_handler))
        .route("/api/v1/catalog", get(catalog_handler))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReconcilePayload {
    #[serde(default)]
    pub(crate) extracted_data: Option<ExtractedFieldSet>,
    #[serde(default)]
    pub(crate) profile_data: Option<ProfileRecord>,
    pub(crate) ruleset: ComparisonRuleset,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerifyPayload {
    #[serde(flatten)]
    pub(crate) request: DocumentVerificationRequest,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchPayload {
    pub(crate) documents: Vec<serde_json::Value>,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn reconcile_handler(
    State(service): State<Arc<DocumentVerificationService>>,
    axum::Json(payload): axum::Json<ReconcilePayload>,
) -> Response {
    let result = service.engine().reconcile(
        payload.extracted_data.as_ref(),
        payload.profile_data.as_ref(),
        &payload.ruleset,
    );
    (StatusCode::OK, axum::Json(result)).into_response()
}

pub(crate) async fn verify_handler(
    State(service): State<Arc<DocumentVerificationService>>,
    axum::Json(payload): axum::Json<VerifyPayload>,
) -> Response {
    let today = payload.today.unwrap_or_else(local_today);
    match service.verify(&payload.request, today) {
        Ok(verification) => (StatusCode::OK, axum::Json(verification)).into_response(),
        Err(VerificationError::UnknownCategory(category)) => {
            let payload = json!({
                "error": format!("unknown document category `{category}`"),
                "category": category,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn verify_batch_handler(
    State(service): State<Arc<DocumentVerificationService>>,
    axum::Json(payload): axum::Json<BatchPayload>,
) -> Response {
    let today = payload.today.unwrap_or_else(local_today);
    let report = service.verify_batch_json(payload.documents, today);
    (StatusCode::OK, axum::Json(report)).into_response()
}

pub(crate) async fn catalog_handler(
    State(service): State<Arc<DocumentVerificationService>>,
) -> Response {
    let payload = json!({
        "categories": service.catalog().summaries(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}
