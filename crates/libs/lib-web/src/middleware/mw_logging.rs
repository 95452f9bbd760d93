//! # Request/Response Logging Middleware
//!
//! One structured line when a request arrives and one when its response
//! leaves, correlated by the request id from [`RequestStamp`]. Bodies are never
//! logged; header values of credential-bearing headers are redacted.

use crate::middleware::mw_req_stamp::RequestStamp;
use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Headers whose values are never logged.
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "x-api-key", "x-auth-token"];

/// Routes that carry credentials in their bodies.
const SENSITIVE_ENDPOINTS: &[&str] = &["/api/v1/auth/"];

const REDACTED: &str = "***REDACTED***";

/// Header names and values with sensitive values redacted.
pub fn sanitized_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            if SENSITIVE_HEADERS.iter().any(|h| name_lower.contains(h)) {
                Some((name.to_string(), REDACTED.to_string()))
            } else {
                value.to_str().ok().map(|v| (name.to_string(), v.to_string()))
            }
        })
        .collect()
}

pub fn is_sensitive_endpoint(path: &str) -> bool {
    SENSITIVE_ENDPOINTS.iter().any(|ep| path.starts_with(ep))
}

/// Request/response logging middleware.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);

    let request_id = req
        .extensions()
        .get::<RequestStamp>()
        .map(|s| s.id.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let sensitive = is_sensitive_endpoint(&path);

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        query = ?query,
        sensitive,
        "[REQUEST] {} {}",
        method,
        path
    );
    debug!(
        request_id = %request_id,
        headers = ?sanitized_headers(req.headers()),
        "[REQUEST HEADERS]"
    );

    let response = next.run(req).await;

    let duration_ms = start.elapsed().as_millis();
    let status = response.status();
    let status_code = status.as_u16();

    if status.is_server_error() {
        error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status_code,
            duration_ms,
            "[RESPONSE] {} {} -> {} ({}ms) [SERVER ERROR]",
            method,
            path,
            status_code,
            duration_ms
        );
    } else if status.is_client_error() {
        warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status_code,
            duration_ms,
            "[RESPONSE] {} {} -> {} ({}ms) [CLIENT ERROR]",
            method,
            path,
            status_code,
            duration_ms
        );
    } else {
        info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status_code,
            duration_ms,
            "[RESPONSE] {} {} -> {} ({}ms)",
            method,
            path,
            status_code,
            duration_ms
        );
    }

    response
}
