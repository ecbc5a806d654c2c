//! Pre-built Test Fixtures
//!
//! Ready-to-use test data, consistent and predictable for unit tests.

use once_cell::sync::Lazy;
use rust_decimal_macros::dec;

use domain_inventory::NewProduct;

use crate::builders::ProductBuilder;
use crate::memory::MemoryStore;

/// Fixture products for the standard test catalog
pub struct ProductFixtures;

impl ProductFixtures {
    /// The end-to-end scenario product: F100 "Rocket", 50/70, stock 20
    pub fn rocket() -> NewProduct {
        ProductBuilder::new()
            .with_code("F100")
            .with_name("Rocket")
            .with_price(dec!(50))
            .with_retail_price(dec!(70))
            .with_stock(20)
            .build()
    }

    /// Small, cheap item with plenty of stock
    pub fn sparkler() -> NewProduct {
        ProductBuilder::new()
            .with_code("F9")
            .with_name("Sparkler")
            .with_price(dec!(10))
            .with_retail_price(dec!(15))
            .with_stock(200)
            .build()
    }

    /// Item that sits between the others in natural code order
    pub fn fountain() -> NewProduct {
        ProductBuilder::new()
            .with_code("F10")
            .with_name("Fountain")
            .with_price(dec!(30))
            .with_retail_price(dec!(45))
            .with_stock(50)
            .build()
    }

    /// Item with almost no stock, for insufficiency cases
    pub fn scarce() -> NewProduct {
        ProductBuilder::new()
            .with_code("G1")
            .with_name("Ground Spinner")
            .with_price(dec!(20))
            .with_retail_price(dec!(25))
            .with_stock(1)
            .build()
    }
}

static STANDARD_CATALOG: Lazy<Vec<NewProduct>> = Lazy::new(|| {
    vec![
        ProductFixtures::rocket(),
        ProductFixtures::sparkler(),
        ProductFixtures::fountain(),
        ProductFixtures::scarce(),
    ]
});

/// The standard four-product catalog
pub fn standard_catalog() -> Vec<NewProduct> {
    STANDARD_CATALOG.clone()
}

/// Creates a `MemoryStore` seeded with the standard catalog
pub async fn seeded_store() -> MemoryStore {
    use domain_inventory::InventoryStore;

    let store = MemoryStore::new();
    for product in standard_catalog() {
        store
            .create_product(product)
            .await
            .expect("seeding a fresh store cannot conflict");
    }
    store
}
