//! Category shared by tasks and products.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use super::CategoryId;

/// Validation errors raised by [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryError {
    #[error("category name must not be empty")]
    EmptyName,
}

/// Input payload for [`Category::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub project_id: Option<String>,
}

/// Partial update applied by [`Category::update`]; `None` keeps the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// Grouping label with an optional display colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CategorySnapshot", into = "CategorySnapshot")]
pub struct Category {
    id: CategoryId,
    name: String,
    description: Option<String>,
    color: Option<String>,
    is_active: bool,
    project_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Category {
    pub fn create(draft: NewCategory, clock: &dyn Clock) -> Result<Self, CategoryError> {
        let now = clock.utc();
        CategorySnapshot {
            id: draft.id,
            name: draft.name,
            description: draft.description,
            color: draft.color,
            is_active: true,
            project_id: draft.project_id,
            created_at: now,
            updated_at: now,
        }
        .try_into()
    }

    pub fn id(&self) -> &CategoryId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply the provided fields; nothing changes when the new name is blank.
    pub fn update(
        &mut self,
        changes: CategoryChanges,
        clock: &dyn Clock,
    ) -> Result<(), CategoryError> {
        if changes
            .name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(CategoryError::EmptyName);
        }
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(color) = changes.color {
            self.color = Some(color);
        }
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
}

/// Persisted shape of a [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySnapshot {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub is_active: bool,
    pub project_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategorySnapshot {
    fn from(value: Category) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            color: value.color,
            is_active: value.is_active,
            project_id: value.project_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl TryFrom<CategorySnapshot> for Category {
    type Error = CategoryError;

    fn try_from(value: CategorySnapshot) -> Result<Self, Self::Error> {
        if value.name.trim().is_empty() {
            return Err(CategoryError::EmptyName);
        }
        Ok(Self {
            id: value.id,
            name: value.name,
            description: value.description,
            color: value.color,
            is_active: value.is_active,
            project_id: value.project_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}
