//! # Request Stamping Middleware
//!
//! Gives every request an id and a receive time. An inbound `X-Request-ID`
//! is reused when it is present and sane; otherwise a UUID v4 is generated.
//! The id is echoed back in the `X-Request-ID` response header.
//!
//! Handlers can read it with `Extension<RequestStamp>`.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use lib_utils::now_utc;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest inbound request id that is trusted as-is.
const MAX_INBOUND_ID_LEN: usize = 128;

/// Request metadata for tracing and debugging.
#[derive(Clone, Debug)]
pub struct RequestStamp {
    pub id: String,
    pub received_at: DateTime<Utc>,
}

impl RequestStamp {
    fn new(inbound_id: Option<&HeaderValue>) -> Self {
        let id = inbound_id
            .and_then(|v| v.to_str().ok())
            .filter(|id| !id.is_empty() && id.len() <= MAX_INBOUND_ID_LEN)
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            id,
            received_at: now_utc(),
        }
    }
}

/// Request stamping middleware.
pub async fn stamp_req(mut req: Request, next: Next) -> Response {
    let stamp = RequestStamp::new(req.headers().get(&REQUEST_ID_HEADER));

    req.extensions_mut().insert(stamp.clone());

    let mut res = next.run(req).await;

    if let Ok(header_value) = HeaderValue::from_str(&stamp.id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    }

    res
}
