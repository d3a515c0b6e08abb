//! Driving port for task reads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Task, TaskId, UserId};

/// Filters for listing tasks.
///
/// The first present filter wins, in the order assignee, creator, project.
/// With no filter the listing is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksRequest {
    #[serde(default)]
    pub assignee_id: Option<UserId>,
    #[serde(default)]
    pub creator_id: Option<UserId>,
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Driving port for task read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskQuery: Send + Sync {
    /// Look up a task; absence is `Ok(None)`.
    async fn get_task(&self, task_id: TaskId) -> Result<Option<Task>, Error>;

    async fn list_tasks(&self, request: ListTasksRequest) -> Result<Vec<Task>, Error>;

    /// Tasks past their deadline at the current clock time.
    async fn list_overdue(&self, project_id: Option<String>) -> Result<Vec<Task>, Error>;
}
