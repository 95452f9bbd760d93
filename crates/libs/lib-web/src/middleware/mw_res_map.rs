//! # Response Mapping Middleware
//!
//! Boundary catch-all for responses that did not come from [`AppError`]:
//! unknown routes, wrong methods and extractor rejections produce plain-text
//! bodies inside axum. Those are rewritten into the standard JSON envelope.
//! Any 5xx gets the generic internal message, whatever produced it.
//!
//! Responses that already carry a JSON body are passed through untouched.
//!
//! [`AppError`]: lib_core::AppError

use axum::{
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use lib_core::dto::ApiResponse;
use lib_core::error::INTERNAL_ERROR_MESSAGE;
use tracing::{debug, error};

/// Response mapping middleware.
pub async fn map_res(req: Request, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    if !(status.is_client_error() || status.is_server_error()) || is_json(&res) {
        return res;
    }

    let (kind, message) = describe(status);
    if status.is_server_error() {
        error!("[RESPONSE] Unmapped server error: {}", status);
    } else {
        debug!("[RESPONSE] Mapping bare {} into envelope", status);
    }

    let (mut parts, _body) = res.into_parts();
    parts.headers.remove(header::CONTENT_TYPE);
    parts.headers.remove(header::CONTENT_LENGTH);

    let mut mapped = (status, Json(ApiResponse::<()>::failure(kind, message, status.as_u16())))
        .into_response();
    for (name, value) in parts.headers.iter() {
        mapped.headers_mut().insert(name.clone(), value.clone());
    }

    mapped
}

fn is_json(res: &Response) -> bool {
    res.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v: &HeaderValue| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// Envelope kind and message for a bare error status.
fn describe(status: StatusCode) -> (&'static str, &'static str) {
    match status {
        StatusCode::NOT_FOUND => ("NotFound", "Route not found"),
        StatusCode::METHOD_NOT_ALLOWED => ("Validation", "Method not allowed"),
        StatusCode::UNAUTHORIZED => ("Unauthorized", "Unauthorized"),
        s if s.is_server_error() => ("Internal", INTERNAL_ERROR_MESSAGE),
        _ => ("Validation", "Invalid request data"),
    }
}
