//! Tests for the inventory service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rstest::{fixture, rstest};

use super::*;
use crate::config::AppSettings;
use crate::domain::ports::MockProductRepository;
use crate::domain::{ErrorCode, NewProductSet, ProductSet, ProductSetId, ProductStatus};
use crate::test_support::{MutableClock, sample_product};

#[fixture]
fn clock() -> Arc<MutableClock> {
    Arc::new(MutableClock::at_fixture())
}

type Shelf = Arc<Mutex<HashMap<ProductId, Product>>>;

fn shelf(products: Vec<Product>) -> Shelf {
    Arc::new(Mutex::new(
        products
            .into_iter()
            .map(|product| (product.id().clone(), product))
            .collect(),
    ))
}

/// Mock repository backed by `shelf`, counting updates.
fn repo_over(shelf: &Shelf) -> MockProductRepository {
    let mut repo = MockProductRepository::new();
    let reader = shelf.clone();
    repo.expect_get_by_id()
        .returning(move |id| Ok(reader.lock().expect("shelf lock").get(id).cloned()));
    let writer = shelf.clone();
    repo.expect_update().returning(move |product| {
        writer
            .lock()
            .expect("shelf lock")
            .insert(product.id().clone(), product.clone());
        Ok(product.clone())
    });
    repo
}

fn quantity_on(shelf: &Shelf, id: &str) -> u32 {
    shelf
        .lock()
        .expect("shelf lock")
        .get(&ProductId::new(id))
        .map(|product| product.quantity().value())
        .expect("product on shelf")
}

fn coffee_set(clock: &MutableClock) -> ProductSet {
    let mut set = ProductSet::create(
        NewProductSet {
            id: ProductSetId::new("flat-white"),
            name: "Flat white".to_owned(),
            description: None,
            project_id: None,
        },
        clock,
    )
    .expect("valid set");
    set.add_product(ProductId::new("milk"), 2, clock)
        .expect("add milk");
    set.add_product(ProductId::new("beans"), 1, clock)
        .expect("add beans");
    set
}

#[rstest]
#[tokio::test]
async fn restock_revives_out_of_stock_product(clock: Arc<MutableClock>) {
    let shelf = shelf(vec![sample_product("milk", 0, clock.as_ref())]);
    let service = InventoryService::new(Arc::new(repo_over(&shelf)), clock.clone());

    let product = service
        .restock(StockChangeRequest {
            product_id: ProductId::new("milk"),
            amount: 12,
        })
        .await
        .expect("restocked");

    assert_eq!(product.quantity().value(), 12);
    assert_eq!(product.status(), ProductStatus::Active);
}

#[rstest]
#[tokio::test]
async fn write_off_to_zero_marks_out_of_stock(clock: Arc<MutableClock>) {
    let shelf = shelf(vec![sample_product("milk", 3, clock.as_ref())]);
    let service = InventoryService::new(Arc::new(repo_over(&shelf)), clock.clone());

    let product = service
        .write_off(StockChangeRequest {
            product_id: ProductId::new("milk"),
            amount: 3,
        })
        .await
        .expect("written off");

    assert!(product.is_out_of_stock());
    assert_eq!(product.status(), ProductStatus::OutOfStock);
}

#[rstest]
#[case::too_many(4, ErrorCode::InvalidRequest)]
#[case::zero(0, ErrorCode::InvalidRequest)]
#[tokio::test]
async fn invalid_write_off_leaves_stock_unchanged(
    clock: Arc<MutableClock>,
    #[case] amount: u32,
    #[case] expected: ErrorCode,
) {
    let shelf = shelf(vec![sample_product("milk", 3, clock.as_ref())]);
    let service = InventoryService::new(Arc::new(repo_over(&shelf)), clock.clone());

    let error = service
        .write_off(StockChangeRequest {
            product_id: ProductId::new("milk"),
            amount,
        })
        .await
        .expect_err("write-off rejected");

    assert_eq!(error.code(), expected);
    assert_eq!(quantity_on(&shelf, "milk"), 3);
}

#[rstest]
#[tokio::test]
async fn write_off_set_deducts_every_entry(clock: Arc<MutableClock>) {
    let shelf = shelf(vec![
        sample_product("milk", 10, clock.as_ref()),
        sample_product("beans", 5, clock.as_ref()),
    ]);
    let service = InventoryService::new(Arc::new(repo_over(&shelf)), clock.clone());

    let written = service
        .write_off_set(WriteOffSetRequest {
            set: coffee_set(clock.as_ref()),
            multiplier: 3,
        })
        .await
        .expect("set written off");

    assert_eq!(written.len(), 2);
    assert_eq!(quantity_on(&shelf, "milk"), 4);
    assert_eq!(quantity_on(&shelf, "beans"), 2);
}

#[rstest]
#[tokio::test]
async fn write_off_set_is_all_or_nothing(clock: Arc<MutableClock>) {
    let shelf = shelf(vec![
        sample_product("milk", 10, clock.as_ref()),
        sample_product("beans", 1, clock.as_ref()),
    ]);
    let service = InventoryService::new(Arc::new(repo_over(&shelf)), clock.clone());

    let error = service
        .write_off_set(WriteOffSetRequest {
            set: coffee_set(clock.as_ref()),
            multiplier: 2,
        })
        .await
        .expect_err("beans are short");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(quantity_on(&shelf, "milk"), 10);
    assert_eq!(quantity_on(&shelf, "beans"), 1);
}

#[rstest]
#[tokio::test]
async fn write_off_set_surfaces_failed_write(clock: Arc<MutableClock>) {
    let shelf = shelf(vec![
        sample_product("milk", 10, clock.as_ref()),
        sample_product("beans", 5, clock.as_ref()),
    ]);
    let mut repo = MockProductRepository::new();
    let reader = shelf.clone();
    repo.expect_get_by_id()
        .returning(move |id| Ok(reader.lock().expect("shelf lock").get(id).cloned()));
    let writer = shelf.clone();
    repo.expect_update().returning(move |product| {
        if product.id().as_str() == "milk" {
            return Err(ProductRepositoryError::connection("pool exhausted"));
        }
        writer
            .lock()
            .expect("shelf lock")
            .insert(product.id().clone(), product.clone());
        Ok(product.clone())
    });
    let service = InventoryService::new(Arc::new(repo), clock.clone());

    let error = service
        .write_off_set(WriteOffSetRequest {
            set: coffee_set(clock.as_ref()),
            multiplier: 1,
        })
        .await
        .expect_err("milk write fails");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(quantity_on(&shelf, "beans"), 4);
    assert_eq!(quantity_on(&shelf, "milk"), 10);
}

#[rstest]
#[tokio::test]
async fn write_off_set_with_unknown_product_is_not_found(clock: Arc<MutableClock>) {
    let shelf = shelf(vec![sample_product("milk", 10, clock.as_ref())]);
    let service = InventoryService::new(Arc::new(repo_over(&shelf)), clock.clone());

    let error = service
        .write_off_set(WriteOffSetRequest {
            set: coffee_set(clock.as_ref()),
            multiplier: 1,
        })
        .await
        .expect_err("beans are unknown");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(quantity_on(&shelf, "milk"), 10);
}

#[rstest]
#[tokio::test]
async fn list_low_stock_passes_configured_threshold(clock: Arc<MutableClock>) {
    let mut repo = MockProductRepository::new();
    repo.expect_list_low_stock()
        .withf(|threshold, project| *threshold == 4 && project.as_deref() == Some("cafe-central"))
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));

    let service =
        InventoryService::new(Arc::new(repo), clock.clone()).with_low_stock_threshold(4);
    service
        .list_low_stock(Some("cafe-central".to_owned()))
        .await
        .expect("listing succeeds");
}

#[rstest]
fn default_threshold_is_ten(clock: Arc<MutableClock>) {
    let service = InventoryService::new(Arc::new(MockProductRepository::new()), clock);
    assert_eq!(service.low_stock_threshold(), 10);
}

#[rstest]
#[tokio::test]
async fn settings_threshold_reaches_the_repository(clock: Arc<MutableClock>) {
    let settings = AppSettings {
        environment: None,
        bot_token: None,
        low_stock_threshold: 2,
    };
    let mut repo = MockProductRepository::new();
    repo.expect_list_low_stock()
        .withf(|threshold, project| *threshold == 2 && project.is_none())
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));

    let service = InventoryService::from_settings(Arc::new(repo), clock, &settings);
    assert_eq!(service.low_stock_threshold(), 2);
    service.list_low_stock(None).await.expect("listing succeeds");
}
