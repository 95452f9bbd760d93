use axum::Json;
use lib_core::dto::{ApiResponse, PingResponse};

/// Liveness probe.
pub async fn ping() -> Json<ApiResponse<PingResponse>> {
    Json(ApiResponse::success(
        PingResponse {
            message: "pong".to_string(),
        },
        "Server is running",
        200,
    ))
}
