//! Row storage shared by the in-memory repositories.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

/// Entity stored in a [`Table`].
pub(super) trait Record: Clone + Send + Sync {
    fn key(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
    fn project_id(&self) -> Option<&str>;
}

/// Write rejected by a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum WriteConflict {
    Duplicate(String),
    Missing(String),
}

impl WriteConflict {
    /// Convert into a repository error through its constructors.
    pub(super) fn into_error<E>(
        self,
        not_found: impl FnOnce(String) -> E,
        duplicate: impl FnOnce(String) -> E,
    ) -> E {
        match self {
            Self::Missing(id) => not_found(id),
            Self::Duplicate(key) => duplicate(key),
        }
    }
}

/// Whether `row` belongs to `project_id`; `None` matches every row.
pub(super) fn in_project<R: Record>(row: &R, project_id: Option<&str>) -> bool {
    project_id.is_none_or(|project| row.project_id() == Some(project))
}

/// Keyed rows guarded by an async read/write lock.
pub(super) struct Table<R> {
    rows: RwLock<HashMap<String, R>>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl<R: Record> Table<R> {
    /// Insert a row whose key is unused.
    pub(super) async fn insert(&self, row: &R) -> Result<R, WriteConflict> {
        self.insert_unique(row, |_| None).await
    }

    /// Insert a row whose key and secondary key are both unused.
    ///
    /// `secondary` renders the unique secondary key of a row, if it has one.
    pub(super) async fn insert_unique<F>(&self, row: &R, secondary: F) -> Result<R, WriteConflict>
    where
        F: Fn(&R) -> Option<String>,
    {
        let mut rows = self.rows.write().await;
        if rows.contains_key(row.key()) {
            debug!(key = row.key(), "rejected duplicate primary key");
            return Err(WriteConflict::Duplicate(row.key().to_owned()));
        }
        if let Some(wanted) = secondary(row) {
            if rows.values().any(|existing| secondary(existing).as_ref() == Some(&wanted)) {
                debug!(key = %wanted, "rejected duplicate secondary key");
                return Err(WriteConflict::Duplicate(wanted));
            }
        }
        rows.insert(row.key().to_owned(), row.clone());
        Ok(row.clone())
    }

    pub(super) async fn get(&self, key: &str) -> Option<R> {
        self.rows.read().await.get(key).cloned()
    }

    /// First row matching `predicate` in creation order.
    pub(super) async fn find<P>(&self, predicate: P) -> Option<R>
    where
        P: Fn(&R) -> bool,
    {
        self.select(predicate).await.into_iter().next()
    }

    /// Overwrite an existing row.
    pub(super) async fn replace(&self, row: &R) -> Result<R, WriteConflict> {
        let mut rows = self.rows.write().await;
        let Some(slot) = rows.get_mut(row.key()) else {
            return Err(WriteConflict::Missing(row.key().to_owned()));
        };
        *slot = row.clone();
        Ok(row.clone())
    }

    pub(super) async fn remove(&self, key: &str) {
        self.rows.write().await.remove(key);
    }

    /// Rows matching `predicate`, oldest first with ties broken by key.
    pub(super) async fn select<P>(&self, predicate: P) -> Vec<R>
    where
        P: Fn(&R) -> bool,
    {
        let rows = self.rows.read().await;
        let mut selected: Vec<R> = rows.values().filter(|row| predicate(row)).cloned().collect();
        selected.sort_by(|left, right| {
            left.created_at()
                .cmp(&right.created_at())
                .then_with(|| left.key().cmp(right.key()))
        });
        selected
    }
}
