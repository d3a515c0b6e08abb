//! In-memory [`TaskRepository`] adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::table::{Record, Table, WriteConflict, in_project};
use crate::domain::ports::{TaskRepository, TaskRepositoryError};
use crate::domain::{Task, TaskId, UserId};

impl Record for Task {
    fn key(&self) -> &str {
        self.id().as_str()
    }

    fn created_at(&self) -> DateTime<Utc> {
        Task::created_at(self)
    }

    fn project_id(&self) -> Option<&str> {
        Task::project_id(self)
    }
}

fn into_task_error(conflict: WriteConflict) -> TaskRepositoryError {
    conflict.into_error(TaskRepositoryError::not_found, TaskRepositoryError::duplicate)
}

/// Tasks held in memory.
#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: Table<Task>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: &Task) -> Result<Task, TaskRepositoryError> {
        self.tasks.insert(task).await.map_err(into_task_error)
    }

    async fn get_by_id(&self, id: &TaskId) -> Result<Option<Task>, TaskRepositoryError> {
        Ok(self.tasks.get(id.as_str()).await)
    }

    async fn update(&self, task: &Task) -> Result<Task, TaskRepositoryError> {
        self.tasks.replace(task).await.map_err(into_task_error)
    }

    async fn delete(&self, id: &TaskId) -> Result<(), TaskRepositoryError> {
        self.tasks.remove(id.as_str()).await;
        Ok(())
    }

    async fn list_by_assignee(
        &self,
        assignee_id: &UserId,
        project_id: Option<String>,
    ) -> Result<Vec<Task>, TaskRepositoryError> {
        let project = project_id.as_deref();
        Ok(self
            .tasks
            .select(|task| task.assignee_id() == Some(assignee_id) && in_project(task, project))
            .await)
    }

    async fn list_by_creator(
        &self,
        creator_id: &UserId,
        project_id: Option<String>,
    ) -> Result<Vec<Task>, TaskRepositoryError> {
        let project = project_id.as_deref();
        Ok(self
            .tasks
            .select(|task| task.creator_id() == creator_id && in_project(task, project))
            .await)
    }

    async fn list_by_project(&self, project_id: &str) -> Result<Vec<Task>, TaskRepositoryError> {
        Ok(self
            .tasks
            .select(|task| task.project_id() == Some(project_id))
            .await)
    }

    async fn list_overdue(
        &self,
        now: DateTime<Utc>,
        project_id: Option<String>,
    ) -> Result<Vec<Task>, TaskRepositoryError> {
        let project = project_id.as_deref();
        Ok(self
            .tasks
            .select(|task| task.is_overdue(now) && in_project(task, project))
            .await)
    }

    async fn list_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        project_id: Option<String>,
    ) -> Result<Vec<Task>, TaskRepositoryError> {
        let project = project_id.as_deref();
        Ok(self
            .tasks
            .select(|task| {
                let created = task.created_at();
                created >= start && created <= end && in_project(task, project)
            })
            .await)
    }
}
