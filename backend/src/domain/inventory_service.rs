//! Inventory service for stock movements and low-stock reporting.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::config::AppSettings;
use crate::domain::ports::{
    InventoryCommand, ProductRepository, ProductRepositoryError, StockChangeRequest,
    WriteOffSetRequest,
};
use crate::domain::{DEFAULT_LOW_STOCK_THRESHOLD, Error, Product, ProductId};

fn map_product_repository_error(error: ProductRepositoryError) -> Error {
    match error {
        ProductRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("product repository unavailable: {message}"))
        }
        ProductRepositoryError::Query { message } => {
            Error::internal(format!("product repository error: {message}"))
        }
        ProductRepositoryError::NotFound { id } => {
            Error::not_found(format!("product {id} not found"))
        }
        ProductRepositoryError::Duplicate { key } => {
            Error::conflict(format!("product {key} already exists"))
        }
    }
}

/// Inventory service implementing [`InventoryCommand`].
#[derive(Clone)]
pub struct InventoryService<P> {
    product_repo: Arc<P>,
    clock: Arc<dyn Clock>,
    low_stock_threshold: u32,
}

impl<P> InventoryService<P> {
    /// Create a service using the default low-stock threshold.
    pub fn new(product_repo: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            product_repo,
            clock,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }

    /// Create a service using the threshold from `settings`.
    pub fn from_settings(
        product_repo: Arc<P>,
        clock: Arc<dyn Clock>,
        settings: &AppSettings,
    ) -> Self {
        Self::new(product_repo, clock).with_low_stock_threshold(settings.low_stock_threshold)
    }

    /// Override the threshold used by [`InventoryCommand::list_low_stock`].
    #[must_use]
    pub fn with_low_stock_threshold(mut self, threshold: u32) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    pub fn low_stock_threshold(&self) -> u32 {
        self.low_stock_threshold
    }
}

impl<P> InventoryService<P>
where
    P: ProductRepository,
{
    async fn load(&self, product_id: &ProductId) -> Result<Product, Error> {
        self.product_repo
            .get_by_id(product_id)
            .await
            .map_err(map_product_repository_error)?
            .ok_or_else(|| Error::not_found(format!("product {product_id} not found")))
    }

    async fn save(&self, product: &Product) -> Result<Product, Error> {
        self.product_repo
            .update(product)
            .await
            .map_err(map_product_repository_error)
    }
}

#[async_trait]
impl<P> InventoryCommand for InventoryService<P>
where
    P: ProductRepository,
{
    async fn restock(&self, request: StockChangeRequest) -> Result<Product, Error> {
        let mut product = self.load(&request.product_id).await?;
        product.add_stock(request.amount, self.clock.as_ref())?;
        let saved = self.save(&product).await?;
        info!(
            product_id = %saved.id(),
            amount = request.amount,
            quantity = saved.quantity().value(),
            "product restocked"
        );
        Ok(saved)
    }

    async fn write_off(&self, request: StockChangeRequest) -> Result<Product, Error> {
        let mut product = self.load(&request.product_id).await?;
        product.remove_stock(request.amount, self.clock.as_ref())?;
        let saved = self.save(&product).await?;
        info!(
            product_id = %saved.id(),
            amount = request.amount,
            quantity = saved.quantity().value(),
            "product written off"
        );
        if saved.is_out_of_stock() {
            warn!(product_id = %saved.id(), "product is out of stock");
        }
        Ok(saved)
    }

    async fn write_off_set(&self, request: WriteOffSetRequest) -> Result<Vec<Product>, Error> {
        if request.multiplier == 0 {
            return Err(Error::invalid_request("write-off multiplier must be positive"));
        }

        let mut pending = Vec::with_capacity(request.set.products().len());
        for (product_id, per_use) in request.set.products() {
            let amount = per_use.checked_mul(request.multiplier).ok_or_else(|| {
                Error::invalid_request(format!(
                    "write-off amount for product {product_id} exceeds the supported range"
                ))
            })?;
            let product = self.load(product_id).await?;
            product.ensure_available(amount)?;
            pending.push((product, amount));
        }

        // Atomicity across these writes belongs to the repository.
        let mut written = Vec::with_capacity(pending.len());
        for (mut product, amount) in pending {
            product.remove_stock(amount, self.clock.as_ref())?;
            written.push(self.save(&product).await?);
        }
        info!(
            set_id = %request.set.id(),
            multiplier = request.multiplier,
            products = written.len(),
            "product set written off"
        );
        Ok(written)
    }

    async fn list_low_stock(&self, project_id: Option<String>) -> Result<Vec<Product>, Error> {
        self.product_repo
            .list_low_stock(self.low_stock_threshold, project_id)
            .await
            .map_err(map_product_repository_error)
    }
}

#[cfg(test)]
#[path = "inventory_service_tests.rs"]
mod tests;
