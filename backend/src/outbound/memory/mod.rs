//! In-memory repository adapters.
//!
//! These adapters keep rows in process memory behind `tokio` locks. They back
//! the integration tests and local tooling. List queries return rows oldest
//! first, ties broken by id.

mod category_repository;
mod product_repository;
mod table;
mod task_repository;
mod user_repository;

pub use category_repository::InMemoryCategoryRepository;
pub use product_repository::InMemoryProductRepository;
pub use task_repository::InMemoryTaskRepository;
pub use user_repository::InMemoryUserRepository;
