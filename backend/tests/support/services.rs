//! Services wired to in-memory adapters for integration suites.

use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Runtime;
use tracker::domain::{InventoryService, TaskService, UserService};
use tracker::outbound::memory::{
    InMemoryProductRepository, InMemoryTaskRepository, InMemoryUserRepository,
};
use tracker::test_support::MutableClock;

pub struct Services {
    runtime: Runtime,
    pub clock: Arc<MutableClock>,
    pub products: Arc<InMemoryProductRepository>,
    pub users: UserService<InMemoryUserRepository>,
    pub tasks: TaskService<InMemoryTaskRepository, InMemoryUserRepository>,
    pub inventory: InventoryService<InMemoryProductRepository>,
}

impl Services {
    pub fn new() -> Self {
        let runtime = Runtime::new().expect("tokio runtime should initialize");
        let clock = Arc::new(MutableClock::at_fixture());
        let user_repo = Arc::new(InMemoryUserRepository::new());
        let task_repo = Arc::new(InMemoryTaskRepository::new());
        let products = Arc::new(InMemoryProductRepository::new());
        Self {
            runtime,
            users: UserService::new(user_repo.clone(), clock.clone()),
            tasks: TaskService::new(task_repo, user_repo, clock.clone()),
            inventory: InventoryService::new(products.clone(), clock.clone()),
            products,
            clock,
        }
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}
