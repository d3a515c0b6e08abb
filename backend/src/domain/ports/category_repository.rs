//! Port abstraction for category persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Category, CategoryId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by category repository adapters.
    pub enum CategoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "category repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "category repository query failed: {message}",
        /// The row targeted by an update does not exist.
        NotFound { id: String } => "category {id} does not exist",
        /// A uniqueness constraint rejected the write.
        Duplicate { key: String } => "category {key} already exists",
    }
}

/// Port for reading and writing categories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: &Category) -> Result<Category, CategoryRepositoryError>;

    async fn get_by_id(&self, id: &CategoryId)
    -> Result<Option<Category>, CategoryRepositoryError>;

    async fn update(&self, category: &Category) -> Result<Category, CategoryRepositoryError>;

    async fn delete(&self, id: &CategoryId) -> Result<(), CategoryRepositoryError>;

    async fn list_all(
        &self,
        project_id: Option<String>,
    ) -> Result<Vec<Category>, CategoryRepositoryError>;

    async fn list_active(
        &self,
        project_id: Option<String>,
    ) -> Result<Vec<Category>, CategoryRepositoryError>;
}
