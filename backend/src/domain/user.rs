//! User data model.
//!
//! A user is created once per Telegram identity. Roles map onto a fixed
//! capability table; deactivation toggles `is_active` without deleting the
//! record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use super::UserId;

/// Validation errors raised by user constructors and mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserError {
    /// The role tag is not one of the known roles.
    #[error("unknown user role '{value}'")]
    UnknownRole { value: String },
    /// Full name was blank.
    #[error("full name must not be empty")]
    EmptyFullName,
}

/// Organisational role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Owner,
    Admin,
    Manager,
    Employee,
}

/// Capabilities derived from a [`UserRole`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub create_tasks: bool,
    pub manage_users: bool,
    pub view_all_tasks: bool,
    pub manage_inventory: bool,
}

impl UserRole {
    /// Fixed role to capability table.
    pub const fn capabilities(self) -> Capabilities {
        match self {
            Self::Owner | Self::Admin => Capabilities {
                create_tasks: true,
                manage_users: true,
                view_all_tasks: true,
                manage_inventory: true,
            },
            Self::Manager => Capabilities {
                create_tasks: true,
                manage_users: false,
                view_all_tasks: true,
                manage_inventory: true,
            },
            Self::Employee => Capabilities {
                create_tasks: false,
                manage_users: false,
                view_all_tasks: false,
                manage_inventory: false,
            },
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => f.write_str("owner"),
            Self::Admin => f.write_str("admin"),
            Self::Manager => f.write_str("manager"),
            Self::Employee => f.write_str("employee"),
        }
    }
}

impl FromStr for UserRole {
    type Err = UserError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "employee" => Ok(Self::Employee),
            other => Err(UserError::UnknownRole {
                value: other.to_owned(),
            }),
        }
    }
}

/// Input payload for [`User::register`].
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub telegram_id: i64,
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
    pub project_id: Option<String>,
}

/// Application user.
///
/// ## Invariants
/// - `full_name` is non-empty once trimmed.
/// - `updated_at` moves forward on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserSnapshot", into = "UserSnapshot")]
pub struct User {
    id: UserId,
    telegram_id: i64,
    username: String,
    full_name: String,
    role: UserRole,
    is_active: bool,
    project_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Build an active user stamped with the clock's current instant.
    pub fn register(draft: NewUser, clock: &dyn Clock) -> Result<Self, UserError> {
        let now = clock.utc();
        UserSnapshot {
            id: draft.id,
            telegram_id: draft.telegram_id,
            username: draft.username,
            full_name: draft.full_name,
            role: draft.role,
            is_active: true,
            project_id: draft.project_id,
            created_at: now,
            updated_at: now,
        }
        .try_into()
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn telegram_id(&self) -> i64 {
        self.telegram_id
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }

    pub fn role(&self) -> UserRole {
        self.role
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

    pub fn can_create_tasks(&self) -> bool {
        self.role.capabilities().create_tasks
    }

    pub fn can_manage_users(&self) -> bool {
        self.role.capabilities().manage_users
    }

    pub fn can_view_all_tasks(&self) -> bool {
        self.role.capabilities().view_all_tasks
    }

    pub fn can_manage_inventory(&self) -> bool {
        self.role.capabilities().manage_inventory
    }

    /// Assign a new role.
    pub fn change_role(&mut self, role: UserRole, clock: &dyn Clock) {
        self.role = role;
        self.updated_at = clock.utc();
    }

    /// Update profile fields mirrored from Telegram.
    pub fn update_profile(
        &mut self,
        username: impl Into<String>,
        full_name: impl Into<String>,
        clock: &dyn Clock,
    ) -> Result<(), UserError> {
        let full_name = full_name.into();
        if full_name.trim().is_empty() {
            return Err(UserError::EmptyFullName);
        }
        self.username = username.into();
        self.full_name = full_name;
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

/// Persisted shape of a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: UserId,
    pub telegram_id: i64,
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub project_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserSnapshot {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            telegram_id: value.telegram_id,
            username: value.username,
            full_name: value.full_name,
            role: value.role,
            is_active: value.is_active,
            project_id: value.project_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl TryFrom<UserSnapshot> for User {
    type Error = UserError;

    fn try_from(value: UserSnapshot) -> Result<Self, Self::Error> {
        if value.full_name.trim().is_empty() {
            return Err(UserError::EmptyFullName);
        }
        Ok(Self {
            id: value.id,
            telegram_id: value.telegram_id,
            username: value.username,
            full_name: value.full_name,
            role: value.role,
            is_active: value.is_active,
            project_id: value.project_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}
