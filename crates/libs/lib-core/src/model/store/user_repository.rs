//! # User Repository
//!
//! Database access for user accounts.
//!
//! ## Example
//!
//! ```rust,no_run
//! # use lib_core::model::store::{UserRepository, models::UserForCreate};
//! # async fn example(pool: lib_core::DbPool) -> Result<(), lib_core::StoreError> {
//! let user = UserRepository::create(
//!     &pool,
//!     UserForCreate::new("Alice".into(), "alice@example.com".into(), "argon2-digest".into()),
//! ).await?;
//!
//! let found = UserRepository::find_by_email(&pool, "alice@example.com").await?;
//! assert!(found.is_some());
//! # Ok(())
//! # }
//! ```

use super::models::{User, UserForCreate};
use super::{DbPool, StoreError};
use sqlx::{query_as, Executor, Sqlite};
use uuid::Uuid;

/// User repository for database operations.
pub struct UserRepository;

impl UserRepository {
    /// Find a user by their email address.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(User))` - User found with matching email
    /// * `Ok(None)` - No user found with that email
    /// * `Err(StoreError)` - Database error occurred
    pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<User>, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        Ok(query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(executor)
            .await?)
    }

    /// Find a user by id.
    pub async fn find_by_id<'e, E>(executor: E, id: &str) -> Result<Option<User>, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        Ok(query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?)
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// * `StoreError::UniqueViolation` - Email already registered
    /// * `StoreError::Database` - Database connection or query failure
    pub async fn create(pool: &DbPool, user_data: UserForCreate) -> Result<User, StoreError> {
        let id = Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO users (id, name, email, password_hash) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(&user_data.name)
            .bind(&user_data.email)
            .bind(&user_data.password_hash)
            .execute(pool)
            .await?;

        Ok(query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(&id)
            .fetch_one(pool)
            .await?)
    }
}
