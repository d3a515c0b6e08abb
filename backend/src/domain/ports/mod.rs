//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod category_repository;
mod inventory_command;
mod product_repository;
mod task_command;
mod task_query;
mod task_repository;
mod user_command;
mod user_query;
mod user_repository;

#[cfg(test)]
pub use category_repository::MockCategoryRepository;
pub use category_repository::{CategoryRepository, CategoryRepositoryError};
#[cfg(test)]
pub use inventory_command::MockInventoryCommand;
pub use inventory_command::{InventoryCommand, StockChangeRequest, WriteOffSetRequest};
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::{ProductRepository, ProductRepositoryError};
#[cfg(test)]
pub use task_command::MockTaskCommand;
pub use task_command::{CompleteTaskRequest, CreateTaskRequest, TaskCommand};
#[cfg(test)]
pub use task_query::MockTaskQuery;
pub use task_query::{ListTasksRequest, TaskQuery};
#[cfg(test)]
pub use task_repository::MockTaskRepository;
pub use task_repository::{TaskRepository, TaskRepositoryError};
#[cfg(test)]
pub use user_command::MockUserCommand;
pub use user_command::{CreateUserRequest, UserCommand};
#[cfg(test)]
pub use user_query::MockUserQuery;
pub use user_query::{ListUsersRequest, UserQuery};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
