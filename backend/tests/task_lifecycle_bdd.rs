//! Behaviour tests for user registration and the task lifecycle.
//!
//! Scenarios run the task and user services against the in-memory
//! repositories.

// The shared harness also wires inventory, which this suite does not use.
#[expect(
    dead_code,
    reason = "Shared harness has fields used by other integration suites."
)]
#[path = "support/services.rs"]
mod services;

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use services::Services;
use tracker::domain::ports::{
    CompleteTaskRequest, CreateTaskRequest, CreateUserRequest, TaskCommand, UserCommand,
};
use tracker::domain::{Error, ErrorCode, Task, TaskStatus, User, UserId};

struct TaskWorld {
    services: Services,
    owner: RefCell<Option<User>>,
    task: RefCell<Option<Task>>,
    failure: RefCell<Option<Error>>,
}

impl TaskWorld {
    fn new() -> Self {
        Self {
            services: Services::new(),
            owner: RefCell::new(None),
            task: RefCell::new(None),
            failure: RefCell::new(None),
        }
    }

    fn register(&self, telegram_id: i64) -> Result<User, Error> {
        let request = CreateUserRequest {
            telegram_id,
            username: format!("owner{telegram_id}"),
            full_name: "Cafe Owner".to_owned(),
            role: "owner".to_owned(),
            project_id: Some("cafe-central".to_owned()),
        };
        self.services
            .block_on(self.services.users.create_user(request))
    }

    fn create_task(&self, creator_id: UserId, title: String) {
        let mut request = CreateTaskRequest::new(title, creator_id);
        request.project_id = Some("cafe-central".to_owned());
        let outcome = self
            .services
            .block_on(self.services.tasks.create_task(request));
        self.record(outcome);
    }

    fn record(&self, outcome: Result<Task, Error>) {
        match outcome {
            Ok(task) => *self.task.borrow_mut() = Some(task),
            Err(error) => *self.failure.borrow_mut() = Some(error),
        }
    }

    fn task(&self) -> Task {
        self.task.borrow().clone().expect("a task should exist")
    }
}

#[fixture]
fn world() -> TaskWorld {
    TaskWorld::new()
}

#[given("a registered owner with telegram id {telegram_id}")]
fn a_registered_owner(world: &TaskWorld, telegram_id: i64) {
    let owner = world.register(telegram_id).expect("registration succeeds");
    *world.owner.borrow_mut() = Some(owner);
}

#[when("the owner creates a task titled {title}")]
fn the_owner_creates_a_task(world: &TaskWorld, title: String) {
    let owner_id = world
        .owner
        .borrow()
        .as_ref()
        .map(|owner| owner.id().clone())
        .expect("owner registered");
    world.create_task(owner_id, title);
}

#[when("an unknown user creates a task titled {title}")]
fn an_unknown_user_creates_a_task(world: &TaskWorld, title: String) {
    world.create_task(UserId::new("999999"), title);
}

#[when("the task is completed with comment {comment}")]
fn the_task_is_completed(world: &TaskWorld, comment: String) {
    let request = CompleteTaskRequest {
        task_id: world.task().id().clone(),
        comment: Some(comment),
        photos: vec!["https://cdn.example.org/bar.jpg".to_owned()],
    };
    let outcome = world
        .services
        .block_on(world.services.tasks.complete_task(request));
    world.record(outcome);
}

#[when("telegram id {telegram_id} registers again")]
fn telegram_id_registers_again(world: &TaskWorld, telegram_id: i64) {
    if let Err(error) = world.register(telegram_id) {
        *world.failure.borrow_mut() = Some(error);
    }
}

#[then("the task status is completed")]
fn the_task_status_is_completed(world: &TaskWorld) {
    let task = world.task();
    assert_eq!(task.status(), TaskStatus::Completed);
    assert!(task.completed_at().is_some());
    assert_eq!(task.completion_photos().len(), 1);
}

#[then("the completion comment reads {comment}")]
fn the_completion_comment_reads(world: &TaskWorld, comment: String) {
    let task = world.task();
    assert_eq!(
        task.completion_comment().map(|text| text.as_str()),
        Some(comment.as_str())
    );
}

#[then("the last operation fails with {code}")]
fn the_last_operation_fails(world: &TaskWorld, code: String) {
    let expected = match code.as_str() {
        "InvalidRequest" => ErrorCode::InvalidRequest,
        "NotFound" => ErrorCode::NotFound,
        "Conflict" => ErrorCode::Conflict,
        other => panic!("unsupported error code {other}"),
    };
    let failure = world.failure.borrow();
    let error = failure.as_ref().expect("an operation should have failed");
    assert_eq!(error.code(), expected);
}

#[scenario(
    path = "tests/features/task_lifecycle.feature",
    name = "A registered owner creates and completes a task"
)]
fn a_registered_owner_creates_and_completes_a_task(world: TaskWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_lifecycle.feature",
    name = "Completing a task twice is rejected"
)]
fn completing_a_task_twice_is_rejected(world: TaskWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_lifecycle.feature",
    name = "Tasks from unknown creators are rejected"
)]
fn tasks_from_unknown_creators_are_rejected(world: TaskWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_lifecycle.feature",
    name = "Registering the same telegram id twice conflicts"
)]
fn registering_the_same_telegram_id_twice_conflicts(world: TaskWorld) {
    let _ = world;
}
