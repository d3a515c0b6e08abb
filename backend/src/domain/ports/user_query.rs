//! Driving port for user lookups.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, User, UserId};

/// Listing options for users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersRequest {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub active_only: bool,
}

/// Driving port for user read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserQuery: Send + Sync {
    async fn get_user(&self, user_id: UserId) -> Result<Option<User>, Error>;

    async fn get_user_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>, Error>;

    async fn list_users(&self, request: ListUsersRequest) -> Result<Vec<User>, Error>;
}
