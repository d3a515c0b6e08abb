//! Named bundle of products written off together.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use super::{ProductId, ProductSetId};

/// Validation errors raised by [`ProductSet`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductSetError {
    #[error("product set name must not be empty")]
    EmptyName,
    #[error("product set quantities must be positive")]
    NonPositiveQuantity,
    #[error("product {product_id} is not part of the set")]
    ProductNotInSet { product_id: ProductId },
    #[error("product set quantity for {product_id} exceeds the supported range")]
    QuantityOverflow { product_id: ProductId },
}

/// Input payload for [`ProductSet::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProductSet {
    pub id: ProductSetId,
    pub name: String,
    pub description: Option<String>,
    pub project_id: Option<String>,
}

/// Bundle mapping each product to the quantity one use consumes.
///
/// ## Invariants
/// - `name` is non-empty once trimmed.
/// - Every entry quantity is positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProductSetSnapshot", into = "ProductSetSnapshot")]
pub struct ProductSet {
    id: ProductSetId,
    name: String,
    description: Option<String>,
    products: BTreeMap<ProductId, u32>,
    is_active: bool,
    project_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductSet {
    /// Build an empty, active set.
    pub fn create(draft: NewProductSet, clock: &dyn Clock) -> Result<Self, ProductSetError> {
        let now = clock.utc();
        ProductSetSnapshot {
            id: draft.id,
            name: draft.name,
            description: draft.description,
            products: BTreeMap::new(),
            is_active: true,
            project_id: draft.project_id,
            created_at: now,
            updated_at: now,
        }
        .try_into()
    }

    pub fn id(&self) -> &ProductSetId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Entries ordered by product id.
    pub fn products(&self) -> &BTreeMap<ProductId, u32> {
        &self.products
    }

    pub fn quantity_of(&self, product_id: &ProductId) -> Option<u32> {
        self.products.get(product_id).copied()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Add `quantity` units of a product, merging with an existing entry.
    pub fn add_product(
        &mut self,
        product_id: ProductId,
        quantity: u32,
        clock: &dyn Clock,
    ) -> Result<(), ProductSetError> {
        if quantity == 0 {
            return Err(ProductSetError::NonPositiveQuantity);
        }
        let merged = match self.products.get(&product_id) {
            Some(existing) => existing
                .checked_add(quantity)
                .ok_or_else(|| ProductSetError::QuantityOverflow {
                    product_id: product_id.clone(),
                })?,
            None => quantity,
        };
        self.products.insert(product_id, merged);
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Drop a product from the set.
    pub fn remove_product(
        &mut self,
        product_id: &ProductId,
        clock: &dyn Clock,
    ) -> Result<(), ProductSetError> {
        if self.products.remove(product_id).is_none() {
            return Err(ProductSetError::ProductNotInSet {
                product_id: product_id.clone(),
            });
        }
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Replace the quantity of a product already in the set.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
        clock: &dyn Clock,
    ) -> Result<(), ProductSetError> {
        if quantity == 0 {
            return Err(ProductSetError::NonPositiveQuantity);
        }
        let Some(entry) = self.products.get_mut(product_id) else {
            return Err(ProductSetError::ProductNotInSet {
                product_id: product_id.clone(),
            });
        };
        *entry = quantity;
        self.updated_at = clock.utc();
        Ok(())
    }

    pub fn deactivate(&mut self, clock: &dyn Clock) {
        self.is_active = false;
        self.updated_at = clock.utc();
    }

    pub fn activate(&mut self, clock: &dyn Clock) {
        self.is_active = true;
        self.updated_at = clock.utc();
    }
}

/// Persisted shape of a [`ProductSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSetSnapshot {
    pub id: ProductSetId,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub products: BTreeMap<ProductId, u32>,
    pub is_active: bool,
    pub project_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductSet> for ProductSetSnapshot {
    fn from(value: ProductSet) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            products: value.products,
            is_active: value.is_active,
            project_id: value.project_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl TryFrom<ProductSetSnapshot> for ProductSet {
    type Error = ProductSetError;

    fn try_from(value: ProductSetSnapshot) -> Result<Self, Self::Error> {
        if value.name.trim().is_empty() {
            return Err(ProductSetError::EmptyName);
        }
        if value.products.values().any(|quantity| *quantity == 0) {
            return Err(ProductSetError::NonPositiveQuantity);
        }
        Ok(Self {
            id: value.id,
            name: value.name,
            description: value.description,
            products: value.products,
            is_active: value.is_active,
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

    fn empty_set(clock: &MutableClock) -> ProductSet {
        ProductSet::create(
            NewProductSet {
                id: ProductSetId::new("set-1"),
                name: "Morning coffee station".to_owned(),
                description: None,
                project_id: None,
            },
            clock,
        )
        .expect("valid product set")
    }

    #[rstest]
    fn add_product_merges_quantities(clock: MutableClock) {
        let mut set = empty_set(&clock);
        let cups = ProductId::new("cups");
        set.add_product(cups.clone(), 2, &clock).expect("first add");
        set.add_product(cups.clone(), 3, &clock).expect("second add");
        assert_eq!(set.quantity_of(&cups), Some(5));
    }

    #[rstest]
    fn zero_quantities_are_rejected(clock: MutableClock) {
        let mut set = empty_set(&clock);
        let cups = ProductId::new("cups");
        assert_eq!(
            set.add_product(cups.clone(), 0, &clock),
            Err(ProductSetError::NonPositiveQuantity)
        );
        set.add_product(cups.clone(), 1, &clock).expect("add");
        assert_eq!(
            set.update_quantity(&cups, 0, &clock),
            Err(ProductSetError::NonPositiveQuantity)
        );
    }

    #[rstest]
    fn remove_and_update_enforce_membership(clock: MutableClock) {
        let mut set = empty_set(&clock);
        let lids = ProductId::new("lids");
        let expected = Err(ProductSetError::ProductNotInSet {
            product_id: lids.clone(),
        });
        assert_eq!(set.remove_product(&lids, &clock), expected);
        assert_eq!(set.update_quantity(&lids, 4, &clock), expected);
    }

    #[rstest]
    fn update_then_remove_member(clock: MutableClock) {
        let mut set = empty_set(&clock);
        let lids = ProductId::new("lids");
        set.add_product(lids.clone(), 1, &clock).expect("add");
        set.update_quantity(&lids, 6, &clock).expect("update");
        assert_eq!(set.quantity_of(&lids), Some(6));
        set.remove_product(&lids, &clock).expect("remove");
        assert!(set.products().is_empty());
    }

    #[rstest]
    fn blank_name_is_rejected(clock: MutableClock) {
        let result = ProductSet::create(
            NewProductSet {
                id: ProductSetId::new("set-2"),
                name: String::new(),
                description: None,
                project_id: None,
            },
            &clock,
        );
        assert_eq!(result, Err(ProductSetError::EmptyName));
    }
}
