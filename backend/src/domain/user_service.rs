//! User registration and lookup services.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    CreateUserRequest, ListUsersRequest, UserCommand, UserQuery, UserRepository,
    UserRepositoryError,
};
use crate::domain::{Error, NewUser, User, UserId, UserRole};

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::NotFound { id } => Error::not_found(format!("user {id} not found")),
        UserRepositoryError::Duplicate { key } => {
            Error::conflict(format!("user {key} already exists"))
        }
    }
}

/// User service implementing the user command and query ports.
#[derive(Clone)]
pub struct UserService<R> {
    user_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> UserService<R> {
    pub fn new(user_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { user_repo, clock }
    }
}

#[async_trait]
impl<R> UserCommand for UserService<R>
where
    R: UserRepository,
{
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error> {
        let role: UserRole = request.role.parse()?;

        let existing = self
            .user_repo
            .get_by_telegram_id(request.telegram_id)
            .await
            .map_err(map_user_repository_error)?;
        if existing.is_some() {
            warn!(telegram_id = request.telegram_id, "user already registered");
            return Err(Error::conflict(format!(
                "user with telegram id {} already exists",
                request.telegram_id
            )));
        }

        let user = User::register(
            NewUser {
                id: UserId::new(request.telegram_id.to_string()),
                telegram_id: request.telegram_id,
                username: request.username,
                full_name: request.full_name,
                role,
                project_id: request.project_id,
            },
            self.clock.as_ref(),
        )?;

        let saved = self
            .user_repo
            .create(&user)
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %saved.id(), role = %saved.role(), "user registered");
        Ok(saved)
    }
}

#[async_trait]
impl<R> UserQuery for UserService<R>
where
    R: UserRepository,
{
    async fn get_user(&self, user_id: UserId) -> Result<Option<User>, Error> {
        self.user_repo
            .get_by_id(&user_id)
            .await
            .map_err(map_user_repository_error)
    }

    async fn get_user_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>, Error> {
        self.user_repo
            .get_by_telegram_id(telegram_id)
            .await
            .map_err(map_user_repository_error)
    }

    async fn list_users(&self, request: ListUsersRequest) -> Result<Vec<User>, Error> {
        let users = if request.active_only {
            self.user_repo.list_active(request.project_id).await
        } else {
            self.user_repo.list_all(request.project_id).await
        };
        users.map_err(map_user_repository_error)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
