//! Task entity and its status state machine.
//!
//! ```text
//! pending ──start──▶ in_progress ──complete──▶ completed
//!    │                    │                        │
//!    └──────archive───────┴────────archive─────────┘──▶ archived ──restore──▶ pending
//! ```
//!
//! Completion is terminal apart from archiving. Overdue is derived at read
//! time and never stored.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use super::{CategoryId, Comment, Deadline, PhotoUrl, TaskId, UserId};

/// Validation and transition errors raised by [`Task`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    /// Title was blank.
    #[error("task title must not be empty")]
    EmptyTitle,
    /// The task was already completed.
    #[error("task is already completed")]
    AlreadyCompleted,
    /// The requested transition is not allowed from the current status.
    #[error("task cannot move from {from} to {to}")]
    InvalidTransition { from: TaskStatus, to: TaskStatus },
    /// Unknown status tag.
    #[error("unknown task status '{value}'")]
    UnknownStatus { value: String },
    /// Unknown priority tag.
    #[error("unknown task priority '{value}'")]
    UnknownPriority { value: String },
}

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Archived,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::InProgress => f.write_str("in_progress"),
            Self::Completed => f.write_str("completed"),
            Self::Archived => f.write_str("archived"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = TaskError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            other => Err(TaskError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Urgency of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("low"),
            Self::Medium => f.write_str("medium"),
            Self::High => f.write_str("high"),
            Self::Urgent => f.write_str("urgent"),
        }
    }
}

impl FromStr for TaskPriority {
    type Err = TaskError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(TaskError::UnknownPriority {
                value: other.to_owned(),
            }),
        }
    }
}

/// Input payload for [`Task::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub category_id: Option<CategoryId>,
    pub assignee_id: Option<UserId>,
    pub creator_id: UserId,
    pub deadline: Option<Deadline>,
    pub project_id: Option<String>,
}

/// A unit of work assigned within a project.
///
/// ## Invariants
/// - `title` is non-empty once trimmed.
/// - `completed_at` is set iff the task has been completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskSnapshot", into = "TaskSnapshot")]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    category_id: Option<CategoryId>,
    assignee_id: Option<UserId>,
    creator_id: UserId,
    deadline: Option<Deadline>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    completion_photos: Vec<PhotoUrl>,
    completion_comment: Option<Comment>,
    project_id: Option<String>,
}

impl Task {
    /// Build a pending task stamped with the clock's current instant.
    ///
    /// # Examples
    /// ```
    /// use mockable::DefaultClock;
    /// use tracker::domain::{NewTask, Task, TaskId, TaskPriority, TaskStatus, UserId};
    ///
    /// let task = Task::create(
    ///     NewTask {
    ///         id: TaskId::new("t-1"),
    ///         title: "Count pallets".to_owned(),
    ///         description: None,
    ///         priority: TaskPriority::High,
    ///         category_id: None,
    ///         assignee_id: None,
    ///         creator_id: UserId::new("u-1"),
    ///         deadline: None,
    ///         project_id: None,
    ///     },
    ///     &DefaultClock,
    /// )
    /// .unwrap();
    /// assert_eq!(task.status(), TaskStatus::Pending);
    /// ```
    pub fn create(draft: NewTask, clock: &dyn Clock) -> Result<Self, TaskError> {
        let now = clock.utc();
        TaskSnapshot {
            id: draft.id,
            title: draft.title,
            description: draft.description,
            status: TaskStatus::Pending,
            priority: draft.priority,
            category_id: draft.category_id,
            assignee_id: draft.assignee_id,
            creator_id: draft.creator_id,
            deadline: draft.deadline,
            created_at: now,
            updated_at: now,
            completed_at: None,
            completion_photos: Vec::new(),
            completion_comment: None,
            project_id: draft.project_id,
        }
        .try_into()
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn priority(&self) -> TaskPriority {
        self.priority
    }

    pub fn category_id(&self) -> Option<&CategoryId> {
        self.category_id.as_ref()
    }

    pub fn assignee_id(&self) -> Option<&UserId> {
        self.assignee_id.as_ref()
    }

    pub fn creator_id(&self) -> &UserId {
        &self.creator_id
    }

    pub fn deadline(&self) -> Option<Deadline> {
        self.deadline
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn completion_photos(&self) -> &[PhotoUrl] {
        self.completion_photos.as_slice()
    }

    pub fn completion_comment(&self) -> Option<&Comment> {
        self.completion_comment.as_ref()
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Move a pending or in-progress task into progress.
    pub fn start(&mut self, clock: &dyn Clock) -> Result<(), TaskError> {
        match self.status {
            TaskStatus::Pending | TaskStatus::InProgress => {
                self.status = TaskStatus::InProgress;
                self.updated_at = clock.utc();
                Ok(())
            }
            from => Err(TaskError::InvalidTransition {
                from,
                to: TaskStatus::InProgress,
            }),
        }
    }

    /// Mark the task completed, recording optional evidence.
    ///
    /// Photos replace any previous evidence only when non-empty.
    pub fn complete(
        &mut self,
        comment: Option<Comment>,
        photos: Vec<PhotoUrl>,
        clock: &dyn Clock,
    ) -> Result<(), TaskError> {
        match self.status {
            TaskStatus::Completed => return Err(TaskError::AlreadyCompleted),
            TaskStatus::Archived => {
                return Err(TaskError::InvalidTransition {
                    from: TaskStatus::Archived,
                    to: TaskStatus::Completed,
                });
            }
            TaskStatus::Pending | TaskStatus::InProgress => {}
        }

        let now = clock.utc();
        self.status = TaskStatus::Completed;
        self.completed_at = Some(now);
        self.updated_at = now;
        if comment.is_some() {
            self.completion_comment = comment;
        }
        if !photos.is_empty() {
            self.completion_photos = photos;
        }
        Ok(())
    }

    /// Archive the task from any status.
    pub fn archive(&mut self, clock: &dyn Clock) {
        self.status = TaskStatus::Archived;
        self.updated_at = clock.utc();
    }

    /// Return an archived task to the pending queue.
    pub fn restore(&mut self, clock: &dyn Clock) -> Result<(), TaskError> {
        if self.status != TaskStatus::Archived {
            return Err(TaskError::InvalidTransition {
                from: self.status,
                to: TaskStatus::Pending,
            });
        }
        self.status = TaskStatus::Pending;
        self.updated_at = clock.utc();
        Ok(())
    }

    pub fn reassign(&mut self, assignee_id: Option<UserId>, clock: &dyn Clock) {
        self.assignee_id = assignee_id;
        self.updated_at = clock.utc();
    }

    pub fn reschedule(&mut self, deadline: Option<Deadline>, clock: &dyn Clock) {
        self.deadline = deadline;
        self.updated_at = clock.utc();
    }

    pub fn reprioritise(&mut self, priority: TaskPriority, clock: &dyn Clock) {
        self.priority = priority;
        self.updated_at = clock.utc();
    }

    /// Whether the deadline has passed at `now` without completion.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) => self.status != TaskStatus::Completed && deadline.has_passed(now),
            None => false,
        }
    }
}

/// Persisted shape of a [`Task`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub category_id: Option<CategoryId>,
    pub assignee_id: Option<UserId>,
    pub creator_id: UserId,
    pub deadline: Option<Deadline>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completion_photos: Vec<PhotoUrl>,
    pub completion_comment: Option<Comment>,
    pub project_id: Option<String>,
}

impl From<Task> for TaskSnapshot {
    fn from(value: Task) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            status: value.status,
            priority: value.priority,
            category_id: value.category_id,
            assignee_id: value.assignee_id,
            creator_id: value.creator_id,
            deadline: value.deadline,
            created_at: value.created_at,
            updated_at: value.updated_at,
            completed_at: value.completed_at,
            completion_photos: value.completion_photos,
            completion_comment: value.completion_comment,
            project_id: value.project_id,
        }
    }
}

impl TryFrom<TaskSnapshot> for Task {
    type Error = TaskError;

    fn try_from(value: TaskSnapshot) -> Result<Self, Self::Error> {
        if value.title.trim().is_empty() {
            return Err(TaskError::EmptyTitle);
        }
        Ok(Self {
            id: value.id,
            title: value.title,
            description: value.description,
            status: value.status,
            priority: value.priority,
            category_id: value.category_id,
            assignee_id: value.assignee_id,
            creator_id: value.creator_id,
            deadline: value.deadline,
            created_at: value.created_at,
            updated_at: value.updated_at,
            completed_at: value.completed_at,
            completion_photos: value.completion_photos,
            completion_comment: value.completion_comment,
            project_id: value.project_id,
        })
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
