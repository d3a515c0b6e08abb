//! In-memory [`UserRepository`] adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::table::{Record, Table, in_project};
use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{User, UserId};

impl Record for User {
    fn key(&self) -> &str {
        self.id().as_str()
    }

    fn created_at(&self) -> DateTime<Utc> {
        User::created_at(self)
    }

    fn project_id(&self) -> Option<&str> {
        User::project_id(self)
    }
}

fn telegram_key(user: &User) -> Option<String> {
    Some(format!("telegram id {}", user.telegram_id()))
}

/// Users held in memory; ids and Telegram ids are unique.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Table<User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<User, UserRepositoryError> {
        self.users
            .insert_unique(user, telegram_key)
            .await
            .map_err(|conflict| {
                conflict.into_error(UserRepositoryError::not_found, UserRepositoryError::duplicate)
            })
    }

    async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.users.get(id.as_str()).await)
    }

    async fn get_by_telegram_id(
        &self,
        telegram_id: i64,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .users
            .find(|user| user.telegram_id() == telegram_id)
            .await)
    }

    async fn update(&self, user: &User) -> Result<User, UserRepositoryError> {
        self.users.replace(user).await.map_err(|conflict| {
            conflict.into_error(UserRepositoryError::not_found, UserRepositoryError::duplicate)
        })
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserRepositoryError> {
        self.users.remove(id.as_str()).await;
        Ok(())
    }

    async fn list_all(&self, project_id: Option<String>) -> Result<Vec<User>, UserRepositoryError> {
        let project = project_id.as_deref();
        Ok(self.users.select(|user| in_project(user, project)).await)
    }

    async fn list_active(
        &self,
        project_id: Option<String>,
    ) -> Result<Vec<User>, UserRepositoryError> {
        let project = project_id.as_deref();
        Ok(self
            .users
            .select(|user| user.is_active() && in_project(user, project))
            .await)
    }
}
