//! # Credential Store
//!
//! SQLite connection pool, schema migrations and the repositories for users,
//! workspaces and memberships.
//!
//! Repository calls that must take part in a caller's transaction accept a
//! `&mut SqliteConnection`, so the same call works on a pooled connection or
//! on `&mut *tx` for an open `sqlx::Transaction`. Read-only calls accept any
//! SQLite executor.

// region: --- Modules
pub mod membership_repository;
pub mod models;
pub mod user_repository;
pub mod workspace_repository;
// endregion: --- Modules

// region: --- Re-exports
pub use membership_repository::MembershipRepository;
pub use user_repository::UserRepository;
pub use workspace_repository::WorkspaceRepository;
// endregion: --- Re-exports

// region: --- Types and Functions
use sqlx::error::ErrorKind;
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::str::FromStr;

/// Type alias for SQLite connection pool.
pub type DbPool = SqlitePool;

/// Create a new SQLite connection pool, creating the database file if missing.
pub async fn create_pool(database_url: &str) -> Result<DbPool, StoreError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePool::connect_with(options).await?;

    Ok(pool)
}

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
// endregion: --- Types and Functions

// region: --- Error
/// Store failure, classified by the database's structured error kind.
///
/// Constraint violations are recognised from `sqlx::error::ErrorKind`, never
/// from driver message text.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated ({})", .constraint.as_deref().unwrap_or("unnamed"))]
    UniqueViolation { constraint: Option<String> },

    #[error("foreign key constraint violated")]
    ForeignKeyViolation,

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { .. })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    return StoreError::UniqueViolation {
                        constraint: db_err.constraint().map(str::to_string),
                    };
                }
                ErrorKind::ForeignKeyViolation => return StoreError::ForeignKeyViolation,
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}
// endregion: --- Error
