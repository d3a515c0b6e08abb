//! Port abstraction for task persistence adapters and their errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Task, TaskId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by task repository adapters.
    pub enum TaskRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "task repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "task repository query failed: {message}",
        /// The row targeted by an update does not exist.
        NotFound { id: String } => "task {id} does not exist",
        /// A uniqueness constraint rejected the write.
        Duplicate { key: String } => "task {key} already exists",
    }
}

/// Port for reading and writing tasks.
///
/// List queries return tasks ordered by creation time, oldest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, task: &Task) -> Result<Task, TaskRepositoryError>;

    async fn get_by_id(&self, id: &TaskId) -> Result<Option<Task>, TaskRepositoryError>;

    /// Replace a stored task; missing rows are reported as `NotFound`.
    async fn update(&self, task: &Task) -> Result<Task, TaskRepositoryError>;

    async fn delete(&self, id: &TaskId) -> Result<(), TaskRepositoryError>;

    async fn list_by_assignee(
        &self,
        assignee_id: &UserId,
        project_id: Option<String>,
    ) -> Result<Vec<Task>, TaskRepositoryError>;

    async fn list_by_creator(
        &self,
        creator_id: &UserId,
        project_id: Option<String>,
    ) -> Result<Vec<Task>, TaskRepositoryError>;

    async fn list_by_project(&self, project_id: &str) -> Result<Vec<Task>, TaskRepositoryError>;

    /// Uncompleted tasks whose deadline lies strictly before `now`.
    async fn list_overdue(
        &self,
        now: DateTime<Utc>,
        project_id: Option<String>,
    ) -> Result<Vec<Task>, TaskRepositoryError>;

    /// Tasks created within `[start, end]`, both ends inclusive.
    async fn list_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        project_id: Option<String>,
    ) -> Result<Vec<Task>, TaskRepositoryError>;
}
