use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::AppState;
use crate::response::ApiResponse;

pub const BODY_NOT_OBJECT_MESSAGE: &str = "Request body must be a JSON object.";

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.body)).into_response()
    }
}

/// Pick the raw key/value pair for a request.
///
/// Body first, query fallback: a non-blank body must be a JSON object and
/// is used as is; a blank body falls back to the query string, whose
/// values are all strings.
///
/// # Errors
///
/// Returns a ready 400 response when the body is present but is not a
/// JSON object.
pub fn raw_request(
    query: HashMap<String, String>,
    body: &[u8],
) -> Result<Map<String, Value>, ApiResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(query
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ApiResponse::error(400, BODY_NOT_OBJECT_MESSAGE)),
    }
}

/// `GET /` and `POST /`.
pub(super) async fn validate_vat(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> ApiResponse {
    let raw = match raw_request(query, &body) {
        Ok(raw) => raw,
        Err(resp) => {
            tracing::info!("VAT request body is not a JSON object");
            return resp;
        }
    };
    let outcome = state.dispatcher.dispatch(&raw).await;
    let resp = ApiResponse::from_outcome(&outcome);
    tracing::debug!(outcome = outcome.kind(), status = resp.status, "VAT request handled");
    resp
}

/// `GET /health`.
pub(super) async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "jurisdictions": state.dispatcher.registry().country_codes(),
    }))
}

pub(super) async fn method_not_allowed() -> ApiResponse {
    ApiResponse::error(405, "Method Not Allowed")
}

pub(super) async fn not_found() -> ApiResponse {
    ApiResponse::error(404, "Not Found")
}
