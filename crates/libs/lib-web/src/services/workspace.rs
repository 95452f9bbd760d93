//! # Workspace Service
//!
//! Workspace provisioning and membership, on top of the credential store.
//!
//! ## Provisioning guarantees
//!
//! - **Create**: the workspace row and its founding membership
//!   (`role = admin`, `status = accepted`) are written in one transaction. Either
//!   both rows are committed or neither is.
//! - **Username conflicts**: the store's unique constraint on
//!   `workspaces.username` is the only arbiter. Two concurrent creates with the
//!   same username both run; the loser's transaction is rolled back and
//!   reported as [`AppError::Conflict`]. A unique violation is only reported
//!   as a taken username once the username is seen in the store.
//! - **Join**: the workspace lookup and the pending membership insert share one
//!   transaction, so a workspace deleted in between surfaces as a foreign-key
//!   failure rather than a dangling membership.
//!
//! Both transactions start with `BEGIN IMMEDIATE`. SQLite hands out the write
//! lock at `BEGIN`, so contending writers wait on the busy timeout instead of
//! failing a read-to-write upgrade with `SQLITE_BUSY`.
//!
//! Each call is single-shot: no retries, no background work. An error before
//! commit rolls the transaction back; if the request future is dropped
//! mid-flight, dropping the `sqlx::Transaction` rolls it back as well.
//!
//! ```text
//! Handlers (HTTP) → WorkspaceService → WorkspaceRepository / MembershipRepository → SQLite
//! ```

use lib_auth::Identity;
use lib_core::model::store::models::{
    JoinedWorkspace, MemberRole, MemberStatus, MembershipForCreate, Workspace, WorkspaceForCreate,
    WorkspaceMember,
};
use lib_core::model::store::{MembershipRepository, WorkspaceRepository};
use lib_core::{AppError, DbPool, StoreError};
use sqlx::{Sqlite, SqliteConnection, Transaction};
use tracing::{debug, error, info, instrument, warn};

/// Member count a freshly provisioned workspace starts with (its creator).
pub const INITIAL_MEMBER_COUNT: i64 = 1;

#[derive(Clone)]
pub struct WorkspaceService {
    pool: DbPool,
}

impl WorkspaceService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a workspace owned by `owner` together with the owner's admin membership.
    ///
    /// # Errors
    ///
    /// * `AppError::Conflict` - `username` is taken; nothing was written
    /// * `AppError::Internal` - any other store or transaction failure; nothing was written
    #[instrument(skip(self, owner, logo), fields(owner_id = %owner.user_id))]
    pub async fn create_workspace(
        &self,
        owner: &Identity,
        name: &str,
        username: &str,
        logo: Option<String>,
    ) -> Result<Workspace, AppError> {
        let mut tx = self.begin().await?;

        let data = WorkspaceForCreate {
            name: name.to_string(),
            username: username.to_string(),
            logo,
            member_count: INITIAL_MEMBER_COUNT,
            user_id: owner.user_id.clone(),
        };

        match insert_workspace_with_admin(&mut tx, &data).await {
            Ok(workspace) => {
                tx.commit().await.map_err(|e| {
                    error!("[WORKSPACE] Failed to commit workspace creation: {}", e);
                    AppError::Internal(format!("Failed to commit transaction: {}", e))
                })?;
                info!("[WORKSPACE] Created workspace {} (@{})", workspace.id, workspace.username);
                Ok(workspace)
            }
            Err(err) => {
                rollback(tx).await;
                Err(err)
            }
        }
    }

    /// Request membership of `workspace_id` for `member` as a pending, non-admin member.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - no such workspace; nothing was written
    /// * `AppError::Conflict` - the user already has a membership row for it
    /// * `AppError::Internal` - store or transaction failure; nothing was written
    #[instrument(skip(self, member), fields(user_id = %member.user_id))]
    pub async fn join_workspace(&self, member: &Identity, workspace_id: &str) -> Result<(), AppError> {
        let mut tx = self.begin().await?;

        match insert_pending_membership(&mut tx, &member.user_id, workspace_id).await {
            Ok(()) => {
                tx.commit().await.map_err(|e| {
                    error!("[WORKSPACE] Failed to commit join: {}", e);
                    AppError::Internal(format!("Failed to commit transaction: {}", e))
                })?;
                info!("[WORKSPACE] User {} requested to join {}", member.user_id, workspace_id);
                Ok(())
            }
            Err(err) => {
                rollback(tx).await;
                Err(err)
            }
        }
    }

    /// Workspaces `member` belongs to (any status), one page at a time.
    pub async fn list_workspaces(
        &self,
        member: &Identity,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<JoinedWorkspace>, AppError> {
        WorkspaceRepository::list_joined_by_user(&self.pool, &member.user_id, limit, offset)
            .await
            .map_err(internal("Failed to get workspaces"))
    }

    pub async fn get_workspace(&self, workspace_id: &str) -> Result<Workspace, AppError> {
        WorkspaceRepository::find_by_id(&self.pool, workspace_id)
            .await
            .map_err(internal("Failed to get workspace"))?
            .ok_or_else(|| AppError::NotFound("Workspace not found".to_string()))
    }

    pub async fn list_members(&self, workspace_id: &str) -> Result<Vec<WorkspaceMember>, AppError> {
        self.get_workspace(workspace_id).await?;

        MembershipRepository::list_by_workspace(&self.pool, workspace_id)
            .await
            .map_err(internal("Failed to get workspace members"))
    }

    async fn begin(&self) -> Result<Transaction<'static, Sqlite>, AppError> {
        self.pool.begin_with("BEGIN IMMEDIATE").await.map_err(|e| {
            error!("[WORKSPACE] Failed to begin transaction: {}", e);
            AppError::Internal(format!("Failed to begin transaction: {}", e))
        })
    }
}

// region:    --- Transaction bodies

async fn insert_workspace_with_admin(
    conn: &mut SqliteConnection,
    data: &WorkspaceForCreate,
) -> Result<Workspace, AppError> {
    let workspace = match WorkspaceRepository::create(conn, data).await {
        Ok(workspace) => workspace,
        Err(err @ StoreError::UniqueViolation { .. }) => {
            return Err(classify_unique_violation(conn, &data.username, err).await)
        }
        Err(other) => {
            error!("[WORKSPACE] Failed to create workspace: {}", other);
            return Err(AppError::Internal(format!("Failed to create workspace: {}", other)));
        }
    };

    debug!("[WORKSPACE] Inserted workspace {}, adding admin membership", workspace.id);

    MembershipRepository::create(
        conn,
        &MembershipForCreate {
            workspace_id: workspace.id.clone(),
            user_id: data.user_id.clone(),
            status: MemberStatus::Accepted,
            role: MemberRole::Admin,
        },
    )
    .await
    .map_err(internal("Failed to join workspace"))?;

    Ok(workspace)
}

/// A unique violation on the workspace insert means "username taken" only when
/// that username is actually stored. SQLite does not name the violated
/// constraint, so the failed statement is followed by a lookup in the same
/// transaction.
async fn classify_unique_violation(
    conn: &mut SqliteConnection,
    username: &str,
    err: StoreError,
) -> AppError {
    match WorkspaceRepository::find_by_username(&mut *conn, username).await {
        Ok(Some(_)) => {
            warn!("[WORKSPACE] Username already taken: {}", username);
            AppError::Conflict("Workspace username already exists".to_string())
        }
        Ok(None) => {
            error!("[WORKSPACE] Failed to create workspace: {}", err);
            AppError::Internal(format!("Failed to create workspace: {}", err))
        }
        Err(lookup) => {
            error!("[WORKSPACE] Failed to create workspace: {} (username lookup: {})", err, lookup);
            AppError::Internal(format!("Failed to create workspace: {}", err))
        }
    }
}

async fn insert_pending_membership(
    conn: &mut SqliteConnection,
    user_id: &str,
    workspace_id: &str,
) -> Result<(), AppError> {
    let workspace = WorkspaceRepository::find_by_id(&mut *conn, workspace_id)
        .await
        .map_err(internal("Failed to get workspace"))?
        .ok_or_else(|| {
            debug!("[WORKSPACE] Join target not found: {}", workspace_id);
            AppError::NotFound("Workspace not found".to_string())
        })?;

    MembershipRepository::create(
        conn,
        &MembershipForCreate {
            workspace_id: workspace.id,
            user_id: user_id.to_string(),
            status: MemberStatus::Pending,
            role: MemberRole::Member,
        },
    )
    .await
    .map_err(|e| match e {
        StoreError::UniqueViolation { .. } => {
            warn!("[WORKSPACE] Duplicate join by {} on {}", user_id, workspace_id);
            AppError::Conflict(
                "Already a member of this workspace or a join request is pending".to_string(),
            )
        }
        other => {
            error!("[WORKSPACE] Failed to join workspace: {}", other);
            AppError::Internal(format!("Failed to join workspace: {}", other))
        }
    })?;

    Ok(())
}

async fn rollback(tx: Transaction<'static, Sqlite>) {
    if let Err(e) = tx.rollback().await {
        error!("[WORKSPACE] Rollback failed: {}", e);
    }
}

/// Log a store failure in full and surface it as `Internal`.
fn internal(context: &'static str) -> impl Fn(StoreError) -> AppError {
    move |e| {
        error!("[WORKSPACE] {}: {}", context, e);
        AppError::Internal(format!("{}: {}", context, e))
    }
}

// endregion: --- Transaction bodies

#[cfg(test)]
mod tests;
