//! Driving port for task mutations.
//!
//! Commands load the task, apply one state transition, and persist the
//! result. Invariant violations surface as `InvalidRequest` errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CategoryId, Error, Task, TaskId, TaskPriority, UserId};

/// Request to create a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub creator_id: UserId,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub assignee_id: Option<UserId>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl CreateTaskRequest {
    /// Minimal request with medium priority and no optional fields.
    pub fn new(title: impl Into<String>, creator_id: UserId) -> Self {
        Self {
            title: title.into(),
            creator_id,
            description: None,
            priority: TaskPriority::default(),
            category_id: None,
            assignee_id: None,
            deadline: None,
            project_id: None,
        }
    }
}

/// Request to mark a task completed.
///
/// A blank comment is treated as no comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteTaskRequest {
    pub task_id: TaskId,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

/// Driving port for task write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskCommand: Send + Sync {
    /// Create a pending task after checking the creator and assignee exist.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use tracker::domain::UserId;
    /// # use tracker::domain::ports::{CreateTaskRequest, TaskCommand};
    /// # async fn example(command: &dyn TaskCommand) -> Result<(), tracker::domain::Error> {
    /// let request = CreateTaskRequest::new("Restock the fridge", UserId::new("1001"));
    /// let task = command.create_task(request).await?;
    /// assert_eq!(task.title(), "Restock the fridge");
    /// # Ok(())
    /// # }
    /// ```
    async fn create_task(&self, request: CreateTaskRequest) -> Result<Task, Error>;

    /// Complete a pending or in-progress task.
    async fn complete_task(&self, request: CompleteTaskRequest) -> Result<Task, Error>;

    async fn start_task(&self, task_id: TaskId) -> Result<Task, Error>;

    async fn archive_task(&self, task_id: TaskId) -> Result<Task, Error>;

    /// Return an archived task to `pending`.
    async fn restore_task(&self, task_id: TaskId) -> Result<Task, Error>;
}
