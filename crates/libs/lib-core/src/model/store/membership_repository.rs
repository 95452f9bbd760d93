//! # Membership Repository
//!
//! Database access for `(workspace, user)` membership rows. A pair appears at
//! most once; a second insert for the same pair is a unique violation.

use super::models::{MembershipForCreate, WorkspaceMember};
use super::StoreError;
use sqlx::{query_as, Executor, Sqlite, SqliteConnection};

pub struct MembershipRepository;

impl MembershipRepository {
    /// Insert a membership row and read it back.
    ///
    /// # Errors
    ///
    /// * `StoreError::UniqueViolation` - the user already has a row for this workspace
    /// * `StoreError::ForeignKeyViolation` - workspace or user does not exist
    pub async fn create(
        conn: &mut SqliteConnection,
        data: &MembershipForCreate,
    ) -> Result<WorkspaceMember, StoreError> {
        sqlx::query(
            "INSERT INTO workspace_members (workspace_id, user_id, status, role) VALUES (?, ?, ?, ?)",
        )
        .bind(&data.workspace_id)
        .bind(&data.user_id)
        .bind(data.status.as_str())
        .bind(data.role.as_str())
        .execute(&mut *conn)
        .await?;

        Ok(query_as::<_, WorkspaceMember>(
            "SELECT * FROM workspace_members WHERE workspace_id = ? AND user_id = ?",
        )
        .bind(&data.workspace_id)
        .bind(&data.user_id)
        .fetch_one(&mut *conn)
        .await?)
    }

    pub async fn find<'e, E>(
        executor: E,
        workspace_id: &str,
        user_id: &str,
    ) -> Result<Option<WorkspaceMember>, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        Ok(query_as::<_, WorkspaceMember>(
            "SELECT * FROM workspace_members WHERE workspace_id = ? AND user_id = ?",
        )
        .bind(workspace_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?)
    }

    /// All membership rows of a workspace, oldest first.
    pub async fn list_by_workspace<'e, E>(
        executor: E,
        workspace_id: &str,
    ) -> Result<Vec<WorkspaceMember>, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        Ok(query_as::<_, WorkspaceMember>(
            "SELECT * FROM workspace_members WHERE workspace_id = ? ORDER BY created_at ASC, rowid ASC",
        )
        .bind(workspace_id)
        .fetch_all(executor)
        .await?)
    }
}
