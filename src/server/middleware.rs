use axum::BoxError;
use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue, Method, Response, StatusCode, header};
use axum::middleware::Next;
use axum::response::IntoResponse;
use std::any::Any;
use std::time::Instant;

use crate::response::{ApiResponse, BACKEND_FAILURE_MESSAGE};

static X_RESPONSE_TIME: HeaderName = HeaderName::from_static("x-response-time");

/// Stamp every response with `X-Response-Time: <ms>ms`.
pub(super) async fn response_time(req: Request, next: Next) -> axum::response::Response {
    let started = Instant::now();
    let mut res = next.run(req).await;
    let elapsed = started.elapsed().as_secs_f64() * 1000.0;
    if let Ok(value) = HeaderValue::from_str(&format!("{elapsed:.3}ms")) {
        res.headers_mut().insert(X_RESPONSE_TIME.clone(), value);
    }
    res
}

/// Answer 405 for any method other than GET, HEAD or POST, on every path.
pub(super) async fn allowed_methods(req: Request, next: Next) -> axum::response::Response {
    if matches!(*req.method(), Method::GET | Method::HEAD | Method::POST) {
        next.run(req).await
    } else {
        tracing::info!(method = %req.method(), path = %req.uri().path(), "method not allowed");
        ApiResponse::error(405, "Method Not Allowed").into_response()
    }
}

/// Map errors from the request timeout stack onto the JSON contract. An
/// elapsed timeout is reported as a backend failure.
pub(super) async fn timeout_response(err: BoxError) -> ApiResponse {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("request timed out");
        ApiResponse::error(500, BACKEND_FAILURE_MESSAGE)
    } else {
        tracing::error!(error = %err, "unhandled middleware error");
        ApiResponse::error(500, "Internal Server Error")
    }
}

/// 500 JSON body for a handler that panicked.
pub(super) fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response<String> {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "request handler panicked");

    let body = serde_json::json!({ "code": 500, "message": "Internal Server Error" }).to_string();
    let mut res = Response::new(body);
    *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    res
}
