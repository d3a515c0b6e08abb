//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
        /// The row targeted by an update does not exist.
        NotFound { id: String } => "user {id} does not exist",
        /// A uniqueness constraint rejected the write.
        Duplicate { key: String } => "user {key} already exists",
    }
}

/// Port for reading and writing team members.
///
/// `project_id` narrows list queries to one tenant; `None` lists every
/// project.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; a repeated id or Telegram id is a duplicate.
    async fn create(&self, user: &User) -> Result<User, UserRepositoryError>;

    async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    async fn get_by_telegram_id(&self, telegram_id: i64)
    -> Result<Option<User>, UserRepositoryError>;

    /// Replace a stored user; missing rows are reported as `NotFound`.
    async fn update(&self, user: &User) -> Result<User, UserRepositoryError>;

    /// Remove a user; deleting an unknown id is not an error.
    async fn delete(&self, id: &UserId) -> Result<(), UserRepositoryError>;

    async fn list_all(&self, project_id: Option<String>) -> Result<Vec<User>, UserRepositoryError>;

    /// Users whose `is_active` flag is set.
    async fn list_active(&self, project_id: Option<String>)
    -> Result<Vec<User>, UserRepositoryError>;
}
