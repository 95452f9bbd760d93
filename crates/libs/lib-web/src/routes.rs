//! # Routes
//!
//! All endpoints live under `/api/v1`. Protected routes sit behind the
//! [`require_auth`] gate as a route layer, so unknown paths still answer 404
//! instead of 401.
//!
//! Layer order, outermost first: CORS, request stamp, trace span, request
//! logging, response mapping, panic catcher. A panicking handler answers with
//! the `Internal` envelope instead of dropping the connection.

use crate::handlers;
use crate::middleware::{log_requests, map_res, require_auth, stamp_req, RequestStamp};
use crate::server::AppState;
use axum::{
    http::{header, HeaderValue, Method, Request},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use lib_core::AppError;
use std::any::Any;
use tower_http::{
    catch_panic::CatchPanicLayer, classify::ServerErrorsFailureClass, cors::CorsLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Build the application router.
pub fn app(state: AppState, allowed_origins: &[String]) -> Router {
    info!("[ROUTE SETUP] Registering HTTP routes...");

    let public = Router::new()
        .route("/ping", get(handlers::health::ping))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login));

    let protected = Router::new()
        .route("/auth/profile", get(handlers::auth::profile))
        .route(
            "/workspaces",
            post(handlers::workspace::create_workspace).get(handlers::workspace::list_workspaces),
        )
        .route("/workspaces/join", post(handlers::workspace::join_workspace))
        .route("/workspaces/{id}", get(handlers::workspace::get_workspace))
        .route("/workspaces/{id}/members", get(handlers::workspace::list_members))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let router = Router::new()
        .nest("/api/v1", public.merge(protected))
        .fallback(handlers::fallback)
        .with_state(state);

    with_boundary(router, allowed_origins)
}

/// Wrap a routed app in the request boundary shared by every endpoint.
fn with_boundary(router: Router, allowed_origins: &[String]) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(from_fn(map_res))
        .layer(from_fn(log_requests))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let request_id = request
                        .extensions()
                        .get::<RequestStamp>()
                        .map(|s| s.id.clone())
                        .unwrap_or_else(|| "unknown".to_string());
                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_failure(
                    |error: ServerErrorsFailureClass, latency: std::time::Duration, _span: &tracing::Span| {
                        tracing::error!(
                            error = ?error,
                            latency_ms = latency.as_millis(),
                            "[HTTP FAILURE] {:?}",
                            error
                        );
                    },
                ),
        )
        .layer(from_fn(stamp_req))
        .layer(cors(allowed_origins))
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Internal(format!("Handler panicked: {}", detail)).into_response()
}

fn cors(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
