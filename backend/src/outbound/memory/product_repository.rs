//! In-memory [`ProductRepository`] adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::table::{Record, Table, WriteConflict, in_project};
use crate::domain::ports::{ProductRepository, ProductRepositoryError};
use crate::domain::{Barcode, Product, ProductId, ProductStatus};

impl Record for Product {
    fn key(&self) -> &str {
        self.id().as_str()
    }

    fn created_at(&self) -> DateTime<Utc> {
        Product::created_at(self)
    }

    fn project_id(&self) -> Option<&str> {
        Product::project_id(self)
    }
}

fn into_product_error(conflict: WriteConflict) -> ProductRepositoryError {
    conflict.into_error(
        ProductRepositoryError::not_found,
        ProductRepositoryError::duplicate,
    )
}

/// Products held in memory.
#[derive(Default)]
pub struct InMemoryProductRepository {
    products: Table<Product>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: &Product) -> Result<Product, ProductRepositoryError> {
        self.products.insert(product).await.map_err(into_product_error)
    }

    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        Ok(self.products.get(id.as_str()).await)
    }

    async fn update(&self, product: &Product) -> Result<Product, ProductRepositoryError> {
        self.products
            .replace(product)
            .await
            .map_err(into_product_error)
    }

    async fn delete(&self, id: &ProductId) -> Result<(), ProductRepositoryError> {
        self.products.remove(id.as_str()).await;
        Ok(())
    }

    async fn list_all(
        &self,
        project_id: Option<String>,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let project = project_id.as_deref();
        Ok(self
            .products
            .select(|product| in_project(product, project))
            .await)
    }

    async fn list_low_stock(
        &self,
        threshold: u32,
        project_id: Option<String>,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let project = project_id.as_deref();
        Ok(self
            .products
            .select(|product| {
                product.status() != ProductStatus::Archived
                    && product.is_low_stock(threshold)
                    && in_project(product, project)
            })
            .await)
    }

    async fn list_out_of_stock(
        &self,
        project_id: Option<String>,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let project = project_id.as_deref();
        Ok(self
            .products
            .select(|product| {
                product.status() == ProductStatus::OutOfStock && in_project(product, project)
            })
            .await)
    }

    async fn search_by_name(
        &self,
        query: &str,
        project_id: Option<String>,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let needle = query.to_lowercase();
        let project = project_id.as_deref();
        Ok(self
            .products
            .select(|product| {
                product.name().to_lowercase().contains(&needle) && in_project(product, project)
            })
            .await)
    }

    async fn get_by_barcode(
        &self,
        barcode: &Barcode,
        project_id: Option<String>,
    ) -> Result<Option<Product>, ProductRepositoryError> {
        let project = project_id.as_deref();
        Ok(self
            .products
            .find(|product| product.barcode() == Some(barcode) && in_project(product, project))
            .await)
    }
}
