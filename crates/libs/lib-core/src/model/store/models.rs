use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User entity representing a complete user record from the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct UserForCreate {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl UserForCreate {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            name,
            email,
            password_hash,
        }
    }
}

/// Workspace entity.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    /// Globally unique handle
    pub username: String,
    pub logo: Option<String>,
    /// Denormalized, informational
    pub member_count: i64,
    /// Owning user
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Data for inserting a workspace row.
#[derive(Debug, Clone)]
pub struct WorkspaceForCreate {
    pub name: String,
    pub username: String,
    pub logo: Option<String>,
    pub member_count: i64,
    pub user_id: String,
}

/// Workspace as seen by one of its members.
#[derive(Debug, Clone, FromRow)]
pub struct JoinedWorkspace {
    #[sqlx(flatten)]
    pub workspace: Workspace,
    #[sqlx(try_from = "String")]
    pub status: MemberStatus,
    #[sqlx(try_from = "String")]
    pub role: MemberRole,
}

/// Membership of a user in a workspace.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct WorkspaceMember {
    pub workspace_id: String,
    pub user_id: String,
    #[sqlx(try_from = "String")]
    pub status: MemberStatus,
    #[sqlx(try_from = "String")]
    pub role: MemberRole,
    pub created_at: DateTime<Utc>,
}

/// Data for inserting a membership row.
#[derive(Debug, Clone)]
pub struct MembershipForCreate {
    pub workspace_id: String,
    pub user_id: String,
    pub status: MemberStatus,
    pub role: MemberRole,
}

// region:    --- Membership enums
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Pending,
    Accepted,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Pending => "pending",
            MemberStatus::Accepted => "accepted",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Admin,
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "admin",
            MemberRole::Member => "member",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MemberStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MemberStatus::Pending),
            "accepted" => Ok(MemberStatus::Accepted),
            _ => Err(ParseEnumError {
                kind: "member status",
                value: s.to_string(),
            }),
        }
    }
}

impl std::str::FromStr for MemberRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(MemberRole::Admin),
            "member" => Ok(MemberRole::Member),
            _ => Err(ParseEnumError {
                kind: "member role",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for MemberStatus {
    type Error = ParseEnumError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for MemberRole {
    type Error = ParseEnumError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
// endregion: --- Membership enums
