//! Task domain services.
//!
//! These services implement the task driving ports. Commands resolve the
//! referenced users, apply one entity transition, and write the task back.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    CompleteTaskRequest, CreateTaskRequest, ListTasksRequest, TaskCommand, TaskQuery,
    TaskRepository, TaskRepositoryError, UserRepository,
};
use crate::domain::user_service::map_user_repository_error;
use crate::domain::{Comment, Deadline, Error, NewTask, PhotoUrl, Task, TaskId, UserId};

fn map_task_repository_error(error: TaskRepositoryError) -> Error {
    match error {
        TaskRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("task repository unavailable: {message}"))
        }
        TaskRepositoryError::Query { message } => {
            Error::internal(format!("task repository error: {message}"))
        }
        TaskRepositoryError::NotFound { id } => Error::not_found(format!("task {id} not found")),
        TaskRepositoryError::Duplicate { key } => {
            Error::conflict(format!("task {key} already exists"))
        }
    }
}

/// Task service implementing the task command and query ports.
#[derive(Clone)]
pub struct TaskService<T, U> {
    task_repo: Arc<T>,
    user_repo: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<T, U> TaskService<T, U> {
    /// Create a service over the task and user repositories.
    pub fn new(task_repo: Arc<T>, user_repo: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            task_repo,
            user_repo,
            clock,
        }
    }
}

impl<T, U> TaskService<T, U>
where
    T: TaskRepository,
    U: UserRepository,
{
    async fn ensure_user_exists(&self, user_id: &UserId, role: &str) -> Result<(), Error> {
        let found = self
            .user_repo
            .get_by_id(user_id)
            .await
            .map_err(map_user_repository_error)?;
        match found {
            Some(_) => Ok(()),
            None => Err(Error::not_found(format!("{role} {user_id} not found"))),
        }
    }

    async fn load(&self, task_id: &TaskId) -> Result<Task, Error> {
        self.task_repo
            .get_by_id(task_id)
            .await
            .map_err(map_task_repository_error)?
            .ok_or_else(|| Error::not_found(format!("task {task_id} not found")))
    }

    async fn transition<F>(&self, task_id: TaskId, apply: F) -> Result<Task, Error>
    where
        F: FnOnce(&mut Task, &dyn Clock) -> Result<(), Error> + Send,
    {
        let mut task = self.load(&task_id).await?;
        apply(&mut task, self.clock.as_ref())?;
        let saved = self
            .task_repo
            .update(&task)
            .await
            .map_err(map_task_repository_error)?;
        info!(task_id = %saved.id(), status = %saved.status(), "task transitioned");
        Ok(saved)
    }
}

/// An absent or empty comment is skipped; blank text is rejected.
fn completion_comment(raw: Option<String>) -> Result<Option<Comment>, Error> {
    match raw {
        Some(text) if !text.is_empty() => Ok(Some(Comment::new(text)?)),
        _ => Ok(None),
    }
}

#[async_trait]
impl<T, U> TaskCommand for TaskService<T, U>
where
    T: TaskRepository,
    U: UserRepository,
{
    async fn create_task(&self, request: CreateTaskRequest) -> Result<Task, Error> {
        self.ensure_user_exists(&request.creator_id, "creator").await?;
        if let Some(assignee_id) = request.assignee_id.as_ref() {
            self.ensure_user_exists(assignee_id, "assignee").await?;
        }

        let task = Task::create(
            NewTask {
                id: TaskId::random(),
                title: request.title,
                description: request.description,
                priority: request.priority,
                category_id: request.category_id,
                assignee_id: request.assignee_id,
                creator_id: request.creator_id,
                deadline: request.deadline.map(Deadline::new),
                project_id: request.project_id,
            },
            self.clock.as_ref(),
        )?;

        let saved = self
            .task_repo
            .create(&task)
            .await
            .map_err(map_task_repository_error)?;
        info!(
            task_id = %saved.id(),
            creator_id = %saved.creator_id(),
            priority = %saved.priority(),
            "task created"
        );
        Ok(saved)
    }

    async fn complete_task(&self, request: CompleteTaskRequest) -> Result<Task, Error> {
        let comment = completion_comment(request.comment)?;
        let photos = request
            .photos
            .into_iter()
            .map(PhotoUrl::new)
            .collect::<Result<Vec<_>, _>>()?;

        self.transition(request.task_id, move |task, clock| {
            task.complete(comment, photos, clock).map_err(Error::from)
        })
        .await
    }

    async fn start_task(&self, task_id: TaskId) -> Result<Task, Error> {
        self.transition(task_id, |task, clock| task.start(clock).map_err(Error::from))
            .await
    }

    async fn archive_task(&self, task_id: TaskId) -> Result<Task, Error> {
        self.transition(task_id, |task, clock| {
            task.archive(clock);
            Ok(())
        })
        .await
    }

    async fn restore_task(&self, task_id: TaskId) -> Result<Task, Error> {
        self.transition(task_id, |task, clock| task.restore(clock).map_err(Error::from))
            .await
    }
}

#[async_trait]
impl<T, U> TaskQuery for TaskService<T, U>
where
    T: TaskRepository,
    U: UserRepository,
{
    async fn get_task(&self, task_id: TaskId) -> Result<Option<Task>, Error> {
        self.task_repo
            .get_by_id(&task_id)
            .await
            .map_err(map_task_repository_error)
    }

    async fn list_tasks(&self, request: ListTasksRequest) -> Result<Vec<Task>, Error> {
        let ListTasksRequest {
            assignee_id,
            creator_id,
            project_id,
        } = request;

        let tasks = if let Some(assignee_id) = assignee_id {
            self.task_repo
                .list_by_assignee(&assignee_id, project_id)
                .await
        } else if let Some(creator_id) = creator_id {
            self.task_repo.list_by_creator(&creator_id, project_id).await
        } else if let Some(project_id) = project_id {
            self.task_repo.list_by_project(&project_id).await
        } else {
            debug!("task listing requested without filters");
            return Ok(Vec::new());
        };
        tasks.map_err(map_task_repository_error)
    }

    async fn list_overdue(&self, project_id: Option<String>) -> Result<Vec<Task>, Error> {
        self.task_repo
            .list_overdue(self.clock.utc(), project_id)
            .await
            .map_err(map_task_repository_error)
    }
}

#[cfg(test)]
#[path = "task_service_tests.rs"]
mod tests;
