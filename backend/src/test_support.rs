//! Test utilities for the tracker crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled when running tests or
//! with the `test-support` feature.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    NewProduct, NewTask, NewUser, Product, ProductId, Quantity, Task, TaskId, TaskPriority, User,
    UserId, UserRole,
};

/// Instant used by fixtures that do not care about the exact time.
pub fn fixture_timestamp() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).single() {
        Some(timestamp) => timestamp,
        None => panic!("fixture timestamp must be unambiguous"),
    }
}

/// Clock whose current instant is set explicitly by the test.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Clock frozen at [`fixture_timestamp`].
    pub fn at_fixture() -> Self {
        Self::new(fixture_timestamp())
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Active user whose id is the decimal Telegram id.
pub fn sample_user(telegram_id: i64, role: UserRole, clock: &dyn Clock) -> User {
    let draft = NewUser {
        id: UserId::new(telegram_id.to_string()),
        telegram_id,
        username: format!("member{telegram_id}"),
        full_name: format!("Team Member {telegram_id}"),
        role,
        project_id: Some("cafe-central".to_owned()),
    };
    match User::register(draft, clock) {
        Ok(user) => user,
        Err(err) => panic!("sample user must be valid: {err}"),
    }
}

/// Pending task created by `creator_id` inside `project_id`.
pub fn sample_task(
    id: &str,
    creator_id: &UserId,
    project_id: Option<&str>,
    clock: &dyn Clock,
) -> Task {
    let draft = NewTask {
        id: TaskId::new(id),
        title: format!("Task {id}"),
        description: None,
        priority: TaskPriority::Medium,
        category_id: None,
        assignee_id: None,
        creator_id: creator_id.clone(),
        deadline: None,
        project_id: project_id.map(str::to_owned),
    };
    match Task::create(draft, clock) {
        Ok(task) => task,
        Err(err) => panic!("sample task must be valid: {err}"),
    }
}

/// Product holding `quantity` units.
pub fn sample_product(id: &str, quantity: u32, clock: &dyn Clock) -> Product {
    let draft = NewProduct {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        description: None,
        quantity: match Quantity::new(i64::from(quantity)) {
            Ok(quantity) => quantity,
            Err(err) => panic!("sample quantity must be valid: {err}"),
        },
        category_id: None,
        photo_url: None,
        barcode: None,
        project_id: Some("cafe-central".to_owned()),
    };
    match Product::create(draft, clock) {
        Ok(product) => product,
        Err(err) => panic!("sample product must be valid: {err}"),
    }
}
