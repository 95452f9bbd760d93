//! # Workspace Data Transfer Objects
//!
//! - `POST /api/v1/workspaces` - [`CreateWorkspaceRequest`] -> [`WorkspaceInfo`]
//! - `GET /api/v1/workspaces?page=&limit=` - [`ListWorkspacesQuery`] -> `Vec<WorkspaceInfo>`
//! - `GET /api/v1/workspaces/{id}` -> [`WorkspaceInfo`]
//! - `GET /api/v1/workspaces/{id}/members` -> `Vec<MemberInfo>`
//! - `POST /api/v1/workspaces/join` - [`JoinWorkspaceRequest`]

use crate::error::AppError;
use crate::model::store::models::{JoinedWorkspace, Workspace, WorkspaceMember};
use lib_utils::{validate_http_url, validate_length};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkspaceRequest {
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub logo: Option<String>,
}

impl CreateWorkspaceRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_length(&self.name, 2, 50, "Name").map_err(AppError::InvalidInput)?;
        validate_length(&self.username, 2, 50, "Username").map_err(AppError::InvalidInput)?;
        if let Some(logo) = self.logo.as_deref().filter(|l| !l.is_empty()) {
            validate_http_url(logo, "Logo").map_err(AppError::InvalidInput)?;
        }
        Ok(())
    }

    /// Logo with the empty string treated as absent.
    pub fn logo(&self) -> Option<String> {
        self.logo.clone().filter(|l| !l.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinWorkspaceRequest {
    pub workspace_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListWorkspacesQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ListWorkspacesQuery {
    /// `(limit, offset)` for the requested page. Non-positive values fall back
    /// to the defaults; the limit is capped at [`MAX_PAGE_LIMIT`].
    pub fn limit_offset(&self) -> (i64, i64) {
        let page = self.page.filter(|p| *p > 0).unwrap_or(1);
        let limit = self
            .limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .min(MAX_PAGE_LIMIT);
        (limit, page.saturating_sub(1).saturating_mul(limit))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    pub id: String,
    pub name: String,
    pub username: String,
    pub logo: Option<String>,
    pub member_count: i64,
    pub user_id: String,
    /// Caller's membership status, present on listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Caller's membership role, present on listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl From<Workspace> for WorkspaceInfo {
    fn from(ws: Workspace) -> Self {
        Self {
            id: ws.id,
            name: ws.name,
            username: ws.username,
            logo: ws.logo,
            member_count: ws.member_count,
            user_id: ws.user_id,
            status: None,
            role: None,
        }
    }
}

impl From<JoinedWorkspace> for WorkspaceInfo {
    fn from(joined: JoinedWorkspace) -> Self {
        Self {
            status: Some(joined.status.to_string()),
            role: Some(joined.role.to_string()),
            ..WorkspaceInfo::from(joined.workspace)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberInfo {
    pub workspace_id: String,
    pub user_id: String,
    pub status: String,
    pub role: String,
}

impl From<WorkspaceMember> for MemberInfo {
    fn from(member: WorkspaceMember) -> Self {
        Self {
            workspace_id: member.workspace_id,
            user_id: member.user_id,
            status: member.status.to_string(),
            role: member.role.to_string(),
        }
    }
}
