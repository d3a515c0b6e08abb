//! Driving port for stock movements.
//!
//! Stock changes never leave a product with a negative quantity: a write-off
//! larger than the available stock fails and nothing is persisted.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Product, ProductId, ProductSet};

/// Request to add or remove units of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockChangeRequest {
    pub product_id: ProductId,
    pub amount: u32,
}

/// Request to write off every product in a set.
///
/// Each entry is deducted `multiplier` times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteOffSetRequest {
    pub set: ProductSet,
    pub multiplier: u32,
}

/// Driving port for inventory operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryCommand: Send + Sync {
    async fn restock(&self, request: StockChangeRequest) -> Result<Product, Error>;

    async fn write_off(&self, request: StockChangeRequest) -> Result<Product, Error>;

    /// Deduct every set entry, checking all products before writing any.
    ///
    /// Stock shortfalls leave every product untouched. Products are then
    /// written one by one; if a write fails, earlier writes stand unless the
    /// repository runs the calls inside one transaction.
    async fn write_off_set(&self, request: WriteOffSetRequest) -> Result<Vec<Product>, Error>;

    /// Products at or below the configured low-stock threshold.
    async fn list_low_stock(&self, project_id: Option<String>) -> Result<Vec<Product>, Error>;
}
