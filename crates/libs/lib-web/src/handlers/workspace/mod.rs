//! # Workspace Handlers
//!
//! All routes here sit behind the auth gate and act on behalf of the
//! [`Identity`] it publishes. Provisioning itself lives in
//! [`WorkspaceService`]; handlers only validate and shape responses.

use crate::services::WorkspaceService;
use axum::{
    extract::{Extension, Json, Path, Query, State},
    http::StatusCode,
};
use lib_auth::Identity;
use lib_core::dto::{
    ApiResponse, CreateWorkspaceRequest, JoinWorkspaceRequest, ListWorkspacesQuery, MemberInfo,
    WorkspaceInfo,
};
use lib_core::AppError;
use tracing::{info, instrument};
use uuid::Uuid;

/// `POST /api/v1/workspaces` - create a workspace owned by the caller.
#[instrument(skip(service, identity, req), fields(user_id = %identity.user_id, username = %req.username))]
pub async fn create_workspace(
    State(service): State<WorkspaceService>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreateWorkspaceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WorkspaceInfo>>), AppError> {
    req.validate()?;

    let workspace = service
        .create_workspace(&identity, &req.name, &req.username, req.logo())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            WorkspaceInfo::from(workspace),
            "Workspace created successfully",
            201,
        )),
    ))
}

/// `GET /api/v1/workspaces?page=&limit=` - workspaces the caller belongs to.
pub async fn list_workspaces(
    State(service): State<WorkspaceService>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<ListWorkspacesQuery>,
) -> Result<Json<ApiResponse<Vec<WorkspaceInfo>>>, AppError> {
    let (limit, offset) = query.limit_offset();

    let workspaces = service
        .list_workspaces(&identity, limit, offset)
        .await?
        .into_iter()
        .map(WorkspaceInfo::from)
        .collect();

    Ok(Json(ApiResponse::success(
        workspaces,
        "Workspaces retrieved successfully",
        200,
    )))
}

/// `GET /api/v1/workspaces/{id}`
pub async fn get_workspace(
    State(service): State<WorkspaceService>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<WorkspaceInfo>>, AppError> {
    let id = parse_workspace_id(&id)?;
    let workspace = service.get_workspace(&id).await?;

    Ok(Json(ApiResponse::success(
        WorkspaceInfo::from(workspace),
        "Workspace retrieved successfully",
        200,
    )))
}

/// `POST /api/v1/workspaces/join` - ask to join; the membership starts pending.
#[instrument(skip(service, identity, req), fields(user_id = %identity.user_id))]
pub async fn join_workspace(
    State(service): State<WorkspaceService>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<JoinWorkspaceRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let workspace_id = parse_workspace_id(&req.workspace_id)?;

    service.join_workspace(&identity, &workspace_id).await?;
    info!("[WORKSPACE] Join request recorded for {}", workspace_id);

    Ok(Json(ApiResponse::ack("Workspace joined successfully", 200)))
}

/// `GET /api/v1/workspaces/{id}/members`
pub async fn list_members(
    State(service): State<WorkspaceService>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<MemberInfo>>>, AppError> {
    let id = parse_workspace_id(&id)?;

    let members = service
        .list_members(&id)
        .await?
        .into_iter()
        .map(MemberInfo::from)
        .collect();

    Ok(Json(ApiResponse::success(
        members,
        "Members retrieved successfully",
        200,
    )))
}

/// Workspace ids are UUIDs; anything else is rejected before touching the store.
fn parse_workspace_id(raw: &str) -> Result<String, AppError> {
    Uuid::parse_str(raw.trim())
        .map(|id| id.to_string())
        .map_err(|_| AppError::InvalidInput("Invalid workspace ID".to_string()))
}
