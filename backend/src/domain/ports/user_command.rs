//! Driving port for user registration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, User};

/// Request to register a team member.
///
/// `role` is the lowercase role tag (`owner`, `admin`, `manager`,
/// `employee`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub telegram_id: i64,
    pub username: String,
    pub full_name: String,
    pub role: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Driving port for user write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// Register an active user; a known Telegram id is a `Conflict`.
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error>;
}
