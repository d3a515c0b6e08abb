//! Port abstraction for product persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Barcode, Product, ProductId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by product repository adapters.
    pub enum ProductRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "product repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "product repository query failed: {message}",
        /// The row targeted by an update does not exist.
        NotFound { id: String } => "product {id} does not exist",
        /// A uniqueness constraint rejected the write.
        Duplicate { key: String } => "product {key} already exists",
    }
}

/// Port for reading and writing inventory items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &Product) -> Result<Product, ProductRepositoryError>;

    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError>;

    /// Replace a stored product; missing rows are reported as `NotFound`.
    async fn update(&self, product: &Product) -> Result<Product, ProductRepositoryError>;

    async fn delete(&self, id: &ProductId) -> Result<(), ProductRepositoryError>;

    async fn list_all(
        &self,
        project_id: Option<String>,
    ) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Non-archived products holding between one and `threshold` units.
    async fn list_low_stock(
        &self,
        threshold: u32,
        project_id: Option<String>,
    ) -> Result<Vec<Product>, ProductRepositoryError>;

    async fn list_out_of_stock(
        &self,
        project_id: Option<String>,
    ) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Case-insensitive substring match on the product name.
    async fn search_by_name(
        &self,
        query: &str,
        project_id: Option<String>,
    ) -> Result<Vec<Product>, ProductRepositoryError>;

    async fn get_by_barcode(
        &self,
        barcode: &Barcode,
        project_id: Option<String>,
    ) -> Result<Option<Product>, ProductRepositoryError>;
}
