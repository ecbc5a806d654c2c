//! Comprehensive tests for domain_inventory

use rust_decimal_macros::dec;

use core_kernel::{Money, ProductCode};
use domain_inventory::{
    filter_catalog, matches_query, InventoryError, NewProduct, Product, ProductPatch,
    MAX_SEARCH_RESULTS,
};

fn code(s: &str) -> ProductCode {
    ProductCode::new(s).unwrap()
}

fn product(c: &str, name: &str, stock: i64) -> Product {
    NewProduct::new(
        code(c),
        name,
        Money::new(dec!(50)),
        Money::new(dec!(70)),
        stock,
    )
    .unwrap()
    .into_product()
}

mod validation {
    use super::*;

    #[test]
    fn test_new_product_keeps_all_fields() {
        let p = product("F100", "Rocket", 20);
        assert_eq!(p.code.as_str(), "F100");
        assert_eq!(p.name, "Rocket");
        assert_eq!(p.price, Money::new(dec!(50)));
        assert_eq!(p.retail_price, Money::new(dec!(70)));
        assert_eq!(p.stock, 20);
    }

    #[test]
    fn test_zero_stock_is_valid() {
        let p = product("F100", "Rocket", 0);
        assert_eq!(p.stock, 0);
    }

    #[test]
    fn test_negative_inputs_rejected() {
        assert!(matches!(
            NewProduct::new(code("X"), "X", Money::new(dec!(1)), Money::new(dec!(1)), -1),
            Err(InventoryError::InvalidStock { .. })
        ));
        assert!(matches!(
            NewProduct::new(code("X"), "X", Money::new(dec!(-1)), Money::new(dec!(1)), 1),
            Err(InventoryError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn test_patch_round_trip_through_all_fields() {
        let mut p = product("F100", "Rocket", 20);
        let patch = ProductPatch {
            name: Some("Sky Rocket".to_string()),
            price: Some(Money::new(dec!(55))),
            retail_price: Some(Money::new(dec!(78))),
            stock: Some(12),
        };
        patch.apply(&mut p).unwrap();

        assert_eq!(p.name, "Sky Rocket");
        assert_eq!(p.price, Money::new(dec!(55)));
        assert_eq!(p.retail_price, Money::new(dec!(78)));
        assert_eq!(p.stock, 12);
    }
}

mod search {
    use super::*;

    #[test]
    fn test_query_matches_either_field() {
        let p = product("F100", "Sky Rocket", 5);
        assert!(matches_query(&p, "f100"));
        assert!(matches_query(&p, "sky"));
        assert!(matches_query(&p, "ROCK"));
        assert!(!matches_query(&p, "wheel"));
    }

    #[test]
    fn test_catalog_filter_caps_at_twenty() {
        let catalog: Vec<Product> = (1..=25)
            .map(|i| product(&format!("C{i}"), "Candle", 5))
            .collect();

        let results = filter_catalog(&catalog, "candle");
        assert_eq!(results.len(), MAX_SEARCH_RESULTS);

        // Natural order means C2 sorts before C10
        let codes: Vec<&str> = results.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes[0], "C1");
        assert_eq!(codes[1], "C2");
        assert!(codes.contains(&"C10"));
    }

    #[test]
    fn test_filter_clones_matching_products_only() {
        let catalog = vec![
            product("F100", "Rocket", 5),
            product("W1", "Wheel", 5),
        ];
        let results = filter_catalog(&catalog, "rocket");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].code.as_str(), "F100");
    }
}
