//! In-memory [`CategoryRepository`] adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::table::{Record, Table, WriteConflict, in_project};
use crate::domain::ports::{CategoryRepository, CategoryRepositoryError};
use crate::domain::{Category, CategoryId};

impl Record for Category {
    fn key(&self) -> &str {
        self.id().as_str()
    }

    fn created_at(&self) -> DateTime<Utc> {
        Category::created_at(self)
    }

    fn project_id(&self) -> Option<&str> {
        Category::project_id(self)
    }
}

fn into_category_error(conflict: WriteConflict) -> CategoryRepositoryError {
    conflict.into_error(
        CategoryRepositoryError::not_found,
        CategoryRepositoryError::duplicate,
    )
}

/// Categories held in memory.
#[derive(Default)]
pub struct InMemoryCategoryRepository {
    categories: Table<Category>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, category: &Category) -> Result<Category, CategoryRepositoryError> {
        self.categories
            .insert(category)
            .await
            .map_err(into_category_error)
    }

    async fn get_by_id(
        &self,
        id: &CategoryId,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        Ok(self.categories.get(id.as_str()).await)
    }

    async fn update(&self, category: &Category) -> Result<Category, CategoryRepositoryError> {
        self.categories
            .replace(category)
            .await
            .map_err(into_category_error)
    }

    async fn delete(&self, id: &CategoryId) -> Result<(), CategoryRepositoryError> {
        self.categories.remove(id.as_str()).await;
        Ok(())
    }

    async fn list_all(
        &self,
        project_id: Option<String>,
    ) -> Result<Vec<Category>, CategoryRepositoryError> {
        let project = project_id.as_deref();
        Ok(self
            .categories
            .select(|category| in_project(category, project))
            .await)
    }

    async fn list_active(
        &self,
        project_id: Option<String>,
    ) -> Result<Vec<Category>, CategoryRepositoryError> {
        let project = project_id.as_deref();
        Ok(self
            .categories
            .select(|category| category.is_active() && in_project(category, project))
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewCategory;
    use crate::test_support::MutableClock;
    use rstest::rstest;

    fn category(id: &str, clock: &MutableClock) -> Category {
        Category::create(
            NewCategory {
                id: CategoryId::new(id),
                name: format!("Category {id}"),
                description: None,
                color: Some("#3390ec".to_owned()),
                project_id: Some("cafe-central".to_owned()),
            },
            clock,
        )
        .expect("valid category")
    }

    #[rstest]
    #[tokio::test]
    async fn inactive_categories_drop_out_of_active_listing() {
        let clock = MutableClock::at_fixture();
        let repo = InMemoryCategoryRepository::new();
        let kitchen = category("kitchen", &clock);
        let mut hall = category("hall", &clock);
        hall.deactivate(&clock);
        repo.create(&kitchen).await.expect("insert");
        repo.create(&hall).await.expect("insert");

        let active = repo
            .list_active(Some("cafe-central".to_owned()))
            .await
            .expect("listing");
        assert_eq!(active, vec![kitchen]);
        assert_eq!(repo.list_all(None).await.expect("listing").len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn update_round_trips_changes() {
        let clock = MutableClock::at_fixture();
        let repo = InMemoryCategoryRepository::new();
        let mut kitchen = category("kitchen", &clock);
        repo.create(&kitchen).await.expect("insert");

        kitchen.deactivate(&clock);
        repo.update(&kitchen).await.expect("update");
        let stored = repo
            .get_by_id(kitchen.id())
            .await
            .expect("lookup")
            .expect("row exists");
        assert!(!stored.is_active());
    }
}
