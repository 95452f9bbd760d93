//! # Authentication Middleware
//!
//! The auth gate in front of every protected route.
//!
//! ```text
//! no credential ──> extracting ──┬──> validated  (Identity in request extensions)
//!                                └──> rejected   (401, request pipeline stops)
//! ```
//!
//! The gate reads exactly one `Authorization: Bearer <token>` header and hands
//! the token to the [`TokenService`]. Every failure collapses into the same
//! `Unauthorized` kind; the token error itself is logged, never returned.
//!
//! Handlers behind the gate take the caller with `Extension<Identity>`:
//!
//! ```rust,no_run
//! use axum::extract::Extension;
//! use lib_auth::Identity;
//!
//! async fn whoami(Extension(identity): Extension<Identity>) -> String {
//!     identity.email
//! }
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::Response,
};
use lib_auth::{token, Identity, TokenService};
use lib_core::AppError;
use std::sync::Arc;
use tracing::{debug, warn};

const BEARER_PREFIX: &str = "Bearer ";

/// Why a request was turned away by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    MissingHeader,
    BadScheme,
    InvalidToken(token::Error),
}

impl AuthRejection {
    /// Message returned to the caller. Token failures share one message.
    pub fn message(&self) -> &'static str {
        match self {
            AuthRejection::MissingHeader => "Authorization header required",
            AuthRejection::BadScheme => "Invalid authorization header format",
            AuthRejection::InvalidToken(_) => "Invalid or expired token",
        }
    }
}

impl From<AuthRejection> for AppError {
    fn from(rejection: AuthRejection) -> Self {
        AppError::Unauthorized(rejection.message().to_string())
    }
}

/// Pull the token out of an `Authorization` header value.
///
/// Only `Bearer <token>` with a non-empty token and no further whitespace is
/// accepted.
pub fn extract_bearer(header: Option<&HeaderValue>) -> Result<&str, AuthRejection> {
    let value = header.ok_or(AuthRejection::MissingHeader)?;
    let value = value.to_str().map_err(|_| AuthRejection::BadScheme)?;

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthRejection::BadScheme)?;

    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthRejection::BadScheme);
    }

    Ok(token)
}

/// Resolve the caller behind an `Authorization` header.
pub fn authenticate(
    tokens: &TokenService,
    header: Option<&HeaderValue>,
) -> Result<Identity, AuthRejection> {
    let token = extract_bearer(header)?;
    let claims = tokens.validate(token).map_err(AuthRejection::InvalidToken)?;
    Ok(Identity::from(claims))
}

/// Authentication middleware for protected routes.
///
/// - **Valid token**: continues with the caller's [`Identity`] in extensions
/// - **Anything else**: `401 Unauthorized` in the standard envelope
pub async fn require_auth(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = authenticate(&tokens, req.headers().get(AUTHORIZATION)).map_err(|rejection| {
        match &rejection {
            AuthRejection::InvalidToken(e) => warn!("[AUTH] Token rejected: {}", e),
            other => warn!("[AUTH] {}", other.message()),
        }
        AppError::from(rejection)
    })?;

    debug!("[AUTH] Authenticated user: {} (id: {})", identity.email, identity.user_id);

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{body_json, test_tokens};
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::{extract::Extension, middleware::from_fn_with_state, routing::get, Router};
    use lib_core::dto::ApiResponse;
    use tower::ServiceExt;

    fn header(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).expect("header value")
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer(Some(&header("Bearer abc.def.ghi"))), Ok("abc.def.ghi"));
        assert_eq!(extract_bearer(None), Err(AuthRejection::MissingHeader));
        assert_eq!(extract_bearer(Some(&header("Bearer "))), Err(AuthRejection::BadScheme));
        assert_eq!(extract_bearer(Some(&header("Token abc"))), Err(AuthRejection::BadScheme));
        assert_eq!(extract_bearer(Some(&header("bearer abc"))), Err(AuthRejection::BadScheme));
        assert_eq!(extract_bearer(Some(&header("Bearer a b"))), Err(AuthRejection::BadScheme));
        assert_eq!(extract_bearer(Some(&header("Bearer"))), Err(AuthRejection::BadScheme));
    }

    #[test]
    fn test_authenticate_yields_identity() {
        let tokens = test_tokens();
        let token = tokens.issue("user-1", "alice@example.com").expect("issue");

        let identity = authenticate(&tokens, Some(&header(&format!("Bearer {}", token))))
            .expect("valid token");

        assert_eq!(identity.user_id, "user-1");
        assert_eq!(identity.email, "alice@example.com");
    }

    #[test]
    fn test_authenticate_rejects_bad_tokens() {
        let tokens = test_tokens();

        let rejection = authenticate(&tokens, Some(&header("Bearer not-a-token")))
            .expect_err("garbage token");
        assert_eq!(rejection, AuthRejection::InvalidToken(token::Error::Malformed));
        assert_eq!(rejection.message(), "Invalid or expired token");

        let expired = tokens
            .issue_at("user-1", "alice@example.com", 0)
            .expect("issue");
        let rejection = authenticate(&tokens, Some(&header(&format!("Bearer {}", expired))))
            .expect_err("expired token");
        assert_eq!(rejection, AuthRejection::InvalidToken(token::Error::Expired));
    }

    fn gated_app() -> Router {
        let tokens = Arc::new(test_tokens());
        Router::new()
            .route(
                "/whoami",
                get(|Extension(identity): Extension<Identity>| async move { identity.user_id }),
            )
            .route_layer(from_fn_with_state(tokens.clone(), require_auth))
            .with_state(tokens)
    }

    async fn call(authorization: Option<&str>) -> axum::response::Response {
        let mut builder = HttpRequest::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        gated_app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_gate_rejects_empty_bearer_and_wrong_scheme() {
        for value in [Some("Bearer "), Some("Token abc"), None] {
            let response = call(value).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "header {:?}", value);

            let body: ApiResponse<serde_json::Value> = body_json(response).await;
            assert!(!body.success);
            assert_eq!(body.kind.as_deref(), Some("Unauthorized"));
            assert_eq!(body.code, 401);
        }
    }

    #[tokio::test]
    async fn test_gate_hides_token_error_kind() {
        let response = call(Some("Bearer x.y.z")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body: ApiResponse<serde_json::Value> = body_json(response).await;
        assert_eq!(body.message.as_deref(), Some("Invalid or expired token"));
    }

    #[tokio::test]
    async fn test_gate_passes_identity_to_handler() {
        let token = test_tokens().issue("user-42", "bob@example.com").expect("issue");

        let response = call(Some(&format!("Bearer {}", token))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"user-42");
    }
}
