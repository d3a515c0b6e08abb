//! Stock-keeping product entity.
//!
//! Status is derived from quantity: reaching zero forces `out_of_stock`, and
//! restocking an out-of-stock product makes it `active` again. Archiving is a
//! manual, one-way step reversed only by [`Product::activate`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use super::{Barcode, CategoryId, PhotoUrl, ProductId, Quantity, ValueObjectError};

/// Default threshold at or below which stock counts as low.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

/// Validation errors raised by [`Product`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductError {
    #[error("product name must not be empty")]
    EmptyName,
    #[error("stock adjustment must be positive")]
    NonPositiveAmount,
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },
    #[error("unknown product status '{value}'")]
    UnknownStatus { value: String },
    #[error(transparent)]
    Quantity(#[from] ValueObjectError),
}

/// Availability status of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Active,
    OutOfStock,
    Archived,
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::OutOfStock => f.write_str("out_of_stock"),
            Self::Archived => f.write_str("archived"),
        }
    }
}

impl FromStr for ProductStatus {
    type Err = ProductError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "out_of_stock" => Ok(Self::OutOfStock),
            "archived" => Ok(Self::Archived),
            other => Err(ProductError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Input payload for [`Product::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub quantity: Quantity,
    pub category_id: Option<CategoryId>,
    pub photo_url: Option<PhotoUrl>,
    pub barcode: Option<Barcode>,
    pub project_id: Option<String>,
}

/// A product held in stock.
///
/// ## Invariants
/// - `name` is non-empty once trimmed.
/// - `quantity` is never negative.
/// - Unless archived, `status` is `out_of_stock` iff `quantity` is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProductSnapshot", into = "ProductSnapshot")]
pub struct Product {
    id: ProductId,
    name: String,
    description: Option<String>,
    quantity: Quantity,
    category_id: Option<CategoryId>,
    photo_url: Option<PhotoUrl>,
    barcode: Option<Barcode>,
    status: ProductStatus,
    project_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a product whose status follows its opening quantity.
    pub fn create(draft: NewProduct, clock: &dyn Clock) -> Result<Self, ProductError> {
        let now = clock.utc();
        ProductSnapshot {
            id: draft.id,
            name: draft.name,
            description: draft.description,
            quantity: draft.quantity,
            category_id: draft.category_id,
            photo_url: draft.photo_url,
            barcode: draft.barcode,
            status: status_for(draft.quantity),
            project_id: draft.project_id,
            created_at: now,
            updated_at: now,
        }
        .try_into()
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn category_id(&self) -> Option<&CategoryId> {
        self.category_id.as_ref()
    }

    pub fn photo_url(&self) -> Option<&PhotoUrl> {
        self.photo_url.as_ref()
    }

    pub fn barcode(&self) -> Option<&Barcode> {
        self.barcode.as_ref()
    }

    pub fn status(&self) -> ProductStatus {
        self.status
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Receive `amount` units into stock.
    pub fn add_stock(&mut self, amount: u32, clock: &dyn Clock) -> Result<(), ProductError> {
        if amount == 0 {
            return Err(ProductError::NonPositiveAmount);
        }
        self.quantity = self.quantity.checked_add(amount)?;
        if self.status == ProductStatus::OutOfStock {
            self.status = ProductStatus::Active;
        }
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Write `amount` units off; the product is untouched on failure.
    pub fn remove_stock(&mut self, amount: u32, clock: &dyn Clock) -> Result<(), ProductError> {
        self.ensure_available(amount)?;
        self.quantity = self.quantity.checked_sub(amount)?;
        if self.quantity.is_zero() && self.status != ProductStatus::Archived {
            self.status = ProductStatus::OutOfStock;
        }
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Check that `amount` units could be written off.
    pub fn ensure_available(&self, amount: u32) -> Result<(), ProductError> {
        if amount == 0 {
            return Err(ProductError::NonPositiveAmount);
        }
        let available = self.quantity.value();
        if available < amount {
            return Err(ProductError::InsufficientStock {
                requested: amount,
                available,
            });
        }
        Ok(())
    }

    /// Whether stock is positive but at or below `threshold`.
    pub fn is_low_stock(&self, threshold: u32) -> bool {
        let quantity = self.quantity.value();
        quantity > 0 && quantity <= threshold
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.quantity.is_zero()
    }

    pub fn archive(&mut self, clock: &dyn Clock) {
        self.status = ProductStatus::Archived;
        self.updated_at = clock.utc();
    }

    /// Leave the archive; status is re-derived from quantity.
    pub fn activate(&mut self, clock: &dyn Clock) {
        self.status = status_for(self.quantity);
        self.updated_at = clock.utc();
    }
}

fn status_for(quantity: Quantity) -> ProductStatus {
    if quantity.is_zero() {
        ProductStatus::OutOfStock
    } else {
        ProductStatus::Active
    }
}

/// Persisted shape of a [`Product`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub quantity: Quantity,
    pub category_id: Option<CategoryId>,
    pub photo_url: Option<PhotoUrl>,
    pub barcode: Option<Barcode>,
    pub status: ProductStatus,
    pub project_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductSnapshot {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            quantity: value.quantity,
            category_id: value.category_id,
            photo_url: value.photo_url,
            barcode: value.barcode,
            status: value.status,
            project_id: value.project_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl TryFrom<ProductSnapshot> for Product {
    type Error = ProductError;

    fn try_from(value: ProductSnapshot) -> Result<Self, Self::Error> {
        if value.name.trim().is_empty() {
            return Err(ProductError::EmptyName);
        }
        Ok(Self {
            id: value.id,
            name: value.name,
            description: value.description,
            quantity: value.quantity,
            category_id: value.category_id,
            photo_url: value.photo_url,
            barcode: value.barcode,
            status: value.status,
            project_id: value.project_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::test_support::MutableClock;
    use rstest::{fixture, rstest};

    #[fixture]
    fn clock() -> MutableClock {
        MutableClock::at_fixture()
    }

    fn product_with(quantity: i64, clock: &MutableClock) -> Product {
        Product::create(
            NewProduct {
                id: ProductId::new("p-1"),
                name: "Milk 1L".to_owned(),
                description: None,
                quantity: Quantity::new(quantity).expect("valid quantity"),
                category_id: None,
                photo_url: None,
                barcode: Some(Barcode::new("4601234567890").expect("valid barcode")),
                project_id: None,
            },
            clock,
        )
        .expect("valid product")
    }

    fn assert_status_matches_quantity(product: &Product) {
        assert_eq!(
            product.status() == ProductStatus::OutOfStock,
            product.quantity().is_zero()
        );
    }

    #[rstest]
    #[case(0, ProductStatus::OutOfStock)]
    #[case(5, ProductStatus::Active)]
    fn create_derives_status_from_quantity(
        clock: MutableClock,
        #[case] quantity: i64,
        #[case] expected: ProductStatus,
    ) {
        assert_eq!(product_with(quantity, &clock).status(), expected);
    }

    #[rstest]
    fn create_rejects_blank_name(clock: MutableClock) {
        let result = Product::create(
            NewProduct {
                id: ProductId::new("p-2"),
                name: " ".to_owned(),
                description: None,
                quantity: Quantity::ZERO,
                category_id: None,
                photo_url: None,
                barcode: None,
                project_id: None,
            },
            &clock,
        );
        assert_eq!(result, Err(ProductError::EmptyName));
    }

    #[rstest]
    fn removing_more_than_available_fails_and_keeps_quantity(clock: MutableClock) {
        let mut product = product_with(3, &clock);
        let before = product.clone();
        clock.advance_seconds(1);

        assert_eq!(
            product.remove_stock(4, &clock),
            Err(ProductError::InsufficientStock {
                requested: 4,
                available: 3
            })
        );
        assert_eq!(product, before);
    }

    #[rstest]
    fn removing_everything_marks_out_of_stock(clock: MutableClock) {
        let mut product = product_with(3, &clock);
        product.remove_stock(1, &clock).expect("partial write-off");
        assert_status_matches_quantity(&product);
        product.remove_stock(2, &clock).expect("full write-off");
        assert_eq!(product.status(), ProductStatus::OutOfStock);
        assert!(product.is_out_of_stock());
        assert_status_matches_quantity(&product);
    }

    #[rstest]
    fn restocking_out_of_stock_product_reactivates_it(clock: MutableClock) {
        let mut product = product_with(0, &clock);
        clock.advance_seconds(30);
        product.add_stock(12, &clock).expect("restock");
        assert_eq!(product.status(), ProductStatus::Active);
        assert_eq!(product.quantity().value(), 12);
        assert_eq!(product.updated_at(), clock.utc());
        assert_status_matches_quantity(&product);
    }

    #[rstest]
    fn zero_amounts_are_rejected(clock: MutableClock) {
        let mut product = product_with(3, &clock);
        assert_eq!(product.add_stock(0, &clock), Err(ProductError::NonPositiveAmount));
        assert_eq!(
            product.remove_stock(0, &clock),
            Err(ProductError::NonPositiveAmount)
        );
    }

    #[rstest]
    fn restock_overflow_is_rejected(clock: MutableClock) {
        let mut product = product_with(i64::from(u32::MAX), &clock);
        assert!(matches!(
            product.add_stock(1, &clock),
            Err(ProductError::Quantity(ValueObjectError::QuantityOutOfRange { .. }))
        ));
        assert_eq!(product.quantity().value(), u32::MAX);
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(10, true)]
    #[case(11, false)]
    fn low_stock_is_positive_and_within_threshold(
        clock: MutableClock,
        #[case] quantity: i64,
        #[case] expected: bool,
    ) {
        let product = product_with(quantity, &clock);
        assert_eq!(product.is_low_stock(DEFAULT_LOW_STOCK_THRESHOLD), expected);
    }

    #[rstest]
    fn stock_queries_ignore_archived_status(clock: MutableClock) {
        let mut product = product_with(0, &clock);
        product.archive(&clock);
        assert_eq!(product.status(), ProductStatus::Archived);
        assert!(product.is_out_of_stock());
    }

    #[rstest]
    fn archived_product_stays_archived_through_stock_changes(clock: MutableClock) {
        let mut product = product_with(2, &clock);
        product.archive(&clock);
        product.remove_stock(2, &clock).expect("write-off");
        assert_eq!(product.status(), ProductStatus::Archived);
        product.add_stock(1, &clock).expect("restock");
        assert_eq!(product.status(), ProductStatus::Archived);
    }

    #[rstest]
    #[case(0, ProductStatus::OutOfStock)]
    #[case(4, ProductStatus::Active)]
    fn activate_rederives_status(
        clock: MutableClock,
        #[case] quantity: i64,
        #[case] expected: ProductStatus,
    ) {
        let mut product = product_with(quantity, &clock);
        product.archive(&clock);
        product.activate(&clock);
        assert_eq!(product.status(), expected);
    }

    #[rstest]
    fn serialises_status_tag_and_plain_quantity(clock: MutableClock) {
        let product = product_with(0, &clock);
        let value = serde_json::to_value(&product).expect("product serialises");
        assert_eq!(value["status"], "out_of_stock");
        assert_eq!(value["quantity"], 0);
        assert_eq!(value["barcode"], "4601234567890");
    }

    #[rstest]
    fn deserialisation_rejects_negative_quantity(clock: MutableClock) {
        let product = product_with(1, &clock);
        let mut value = serde_json::to_value(&product).expect("product serialises");
        value["quantity"] = serde_json::json!(-3);
        assert!(serde_json::from_value::<Product>(value).is_err());
    }
}
