//! # Workspace Repository
//!
//! Database access for workspaces. Inserts take a `&mut SqliteConnection` so
//! they can run inside the provisioning transaction.

use super::models::{JoinedWorkspace, Workspace, WorkspaceForCreate};
use super::StoreError;
use sqlx::{query_as, Executor, Sqlite, SqliteConnection};
use uuid::Uuid;

pub struct WorkspaceRepository;

impl WorkspaceRepository {
    /// Insert a workspace row and read it back.
    ///
    /// # Errors
    ///
    /// * `StoreError::UniqueViolation` - `username` is already taken
    /// * `StoreError::ForeignKeyViolation` - owning user does not exist
    pub async fn create(
        conn: &mut SqliteConnection,
        data: &WorkspaceForCreate,
    ) -> Result<Workspace, StoreError> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO workspaces (id, name, username, logo, member_count, user_id)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&data.name)
        .bind(&data.username)
        .bind(&data.logo)
        .bind(data.member_count)
        .bind(&data.user_id)
        .execute(&mut *conn)
        .await?;

        Ok(query_as::<_, Workspace>("SELECT * FROM workspaces WHERE id = ?")
            .bind(&id)
            .fetch_one(&mut *conn)
            .await?)
    }

    pub async fn find_by_id<'e, E>(executor: E, id: &str) -> Result<Option<Workspace>, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        Ok(query_as::<_, Workspace>("SELECT * FROM workspaces WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?)
    }

    pub async fn find_by_username<'e, E>(
        executor: E,
        username: &str,
    ) -> Result<Option<Workspace>, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        Ok(query_as::<_, Workspace>("SELECT * FROM workspaces WHERE username = ?")
            .bind(username)
            .fetch_optional(executor)
            .await?)
    }

    /// Workspaces the user holds any membership in (pending or accepted),
    /// newest first.
    pub async fn list_joined_by_user<'e, E>(
        executor: E,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<JoinedWorkspace>, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        Ok(query_as::<_, JoinedWorkspace>(
            "SELECT w.*, m.status, m.role
             FROM workspaces w
             JOIN workspace_members m ON m.workspace_id = w.id
             WHERE m.user_id = ?
             ORDER BY w.created_at DESC, w.name ASC
             LIMIT ? OFFSET ?",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await?)
    }
}
