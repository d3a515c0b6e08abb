//! Reusable defaults for task creation.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use super::{CategoryId, NewTask, TaskId, TaskPriority, TaskTemplateId, UserId};

/// Validation errors raised by [`TaskTemplate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskTemplateError {
    #[error("template name must not be empty")]
    EmptyName,
    #[error("periodic templates require a positive period in days")]
    MissingPeriod,
}

/// Recurrence of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recurrence {
    OneOff,
    Every { days: u32 },
}

impl Recurrence {
    /// Build a recurrence from the stored flag and period.
    pub fn from_parts(
        is_periodic: bool,
        period_days: Option<u32>,
    ) -> Result<Self, TaskTemplateError> {
        if !is_periodic {
            return Ok(Self::OneOff);
        }
        match period_days {
            Some(days) if days > 0 => Ok(Self::Every { days }),
            _ => Err(TaskTemplateError::MissingPeriod),
        }
    }

    pub fn is_periodic(self) -> bool {
        matches!(self, Self::Every { .. })
    }

    pub fn period_days(self) -> Option<u32> {
        match self {
            Self::OneOff => None,
            Self::Every { days } => Some(days),
        }
    }
}

/// Input payload for [`TaskTemplate::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskTemplate {
    pub id: TaskTemplateId,
    pub name: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub category_id: Option<CategoryId>,
    pub assignee_id: Option<UserId>,
    pub recurrence: Recurrence,
    pub project_id: Option<String>,
}

/// Partial update applied by [`TaskTemplate::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskTemplateChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub category_id: Option<CategoryId>,
    pub assignee_id: Option<UserId>,
}

/// Template holding default values for new tasks.
///
/// ## Invariants
/// - `name` is non-empty once trimmed.
/// - A periodic template always has a positive period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskTemplateSnapshot", into = "TaskTemplateSnapshot")]
pub struct TaskTemplate {
    id: TaskTemplateId,
    name: String,
    description: Option<String>,
    priority: TaskPriority,
    category_id: Option<CategoryId>,
    assignee_id: Option<UserId>,
    recurrence: Recurrence,
    is_active: bool,
    project_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TaskTemplate {
    pub fn create(draft: NewTaskTemplate, clock: &dyn Clock) -> Result<Self, TaskTemplateError> {
        let now = clock.utc();
        TaskTemplateSnapshot {
            id: draft.id,
            name: draft.name,
            description: draft.description,
            priority: draft.priority,
            category_id: draft.category_id,
            assignee_id: draft.assignee_id,
            is_periodic: draft.recurrence.is_periodic(),
            period_days: draft.recurrence.period_days(),
            is_active: true,
            project_id: draft.project_id,
            created_at: now,
            updated_at: now,
        }
        .try_into()
    }

    pub fn id(&self) -> &TaskTemplateId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
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

    pub fn recurrence(&self) -> Recurrence {
        self.recurrence
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn update(
        &mut self,
        changes: TaskTemplateChanges,
        clock: &dyn Clock,
    ) -> Result<(), TaskTemplateError> {
        if changes
            .name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(TaskTemplateError::EmptyName);
        }
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(category_id) = changes.category_id {
            self.category_id = Some(category_id);
        }
        if let Some(assignee_id) = changes.assignee_id {
            self.assignee_id = Some(assignee_id);
        }
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Switch the template between one-off and periodic.
    pub fn set_recurrence(
        &mut self,
        recurrence: Recurrence,
        clock: &dyn Clock,
    ) -> Result<(), TaskTemplateError> {
        let recurrence =
            Recurrence::from_parts(recurrence.is_periodic(), recurrence.period_days())?;
        self.recurrence = recurrence;
        self.updated_at = clock.utc();
        Ok(())
    }

    pub fn deactivate(&mut self, clock: &dyn Clock) {
        self.is_active = false;
        self.updated_at = clock.utc();
    }

    pub fn activate(&mut self, clock: &dyn Clock) {
        self.is_active = true;
        self.updated_at = clock.utc();
    }

    /// Prefill a task draft from the template defaults.
    pub fn to_task_draft(&self, task_id: TaskId, creator_id: UserId) -> NewTask {
        NewTask {
            id: task_id,
            title: self.name.clone(),
            description: self.description.clone(),
            priority: self.priority,
            category_id: self.category_id.clone(),
            assignee_id: self.assignee_id.clone(),
            creator_id,
            deadline: None,
            project_id: self.project_id.clone(),
        }
    }
}

/// Persisted shape of a [`TaskTemplate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTemplateSnapshot {
    pub id: TaskTemplateId,
    pub name: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub category_id: Option<CategoryId>,
    pub assignee_id: Option<UserId>,
    pub is_periodic: bool,
    pub period_days: Option<u32>,
    pub is_active: bool,
    pub project_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TaskTemplate> for TaskTemplateSnapshot {
    fn from(value: TaskTemplate) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            priority: value.priority,
            category_id: value.category_id,
            assignee_id: value.assignee_id,
            is_periodic: value.recurrence.is_periodic(),
            period_days: value.recurrence.period_days(),
            is_active: value.is_active,
            project_id: value.project_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl TryFrom<TaskTemplateSnapshot> for TaskTemplate {
    type Error = TaskTemplateError;

    fn try_from(value: TaskTemplateSnapshot) -> Result<Self, Self::Error> {
        if value.name.trim().is_empty() {
            return Err(TaskTemplateError::EmptyName);
        }
        let recurrence = Recurrence::from_parts(value.is_periodic, value.period_days)?;
        Ok(Self {
            id: value.id,
            name: value.name,
            description: value.description,
            priority: value.priority,
            category_id: value.category_id,
            assignee_id: value.assignee_id,
            recurrence,
            is_active: value.is_active,
            project_id: value.project_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}
