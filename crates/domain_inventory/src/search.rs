//! Product search
//!
//! Case-insensitive substring match over code or name, capped at
//! [`MAX_SEARCH_RESULTS`]. The predicate lives here so the in-memory adapter
//! and the SQL adapter (which pushes the same match down as `ILIKE`) agree
//! on semantics.

use core_kernel::natural_cmp;

use crate::product::Product;

/// Maximum number of results a search returns
pub const MAX_SEARCH_RESULTS: usize = 20;

/// Returns true if the product matches the query
///
/// Matching is a case-insensitive substring test against the product code
/// or name. An empty query matches nothing.
pub fn matches_query(product: &Product, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return false;
    }
    product.code.as_str().to_lowercase().contains(&query)
        || product.name.to_lowercase().contains(&query)
}

/// Filters a catalog by query, capped and in natural code order
pub fn filter_catalog<'a, I>(products: I, query: &str) -> Vec<Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    let mut matched: Vec<Product> = products
        .into_iter()
        .filter(|p| matches_query(p, query))
        .cloned()
        .collect();
    matched.sort_by(|a, b| natural_cmp(a.code.as_str(), b.code.as_str()));
    matched.truncate(MAX_SEARCH_RESULTS);
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{Money, ProductCode};
    use rust_decimal_macros::dec;

    fn product(code: &str, name: &str) -> Product {
        Product {
            code: ProductCode::new(code).unwrap(),
            name: name.to_string(),
            price: Money::new(dec!(50)),
            retail_price: Money::new(dec!(70)),
            stock: 10,
        }
    }

    #[test]
    fn test_matches_code_case_insensitively() {
        let p = product("F100", "Rocket");
        assert!(matches_query(&p, "f10"));
        assert!(matches_query(&p, "100"));
        assert!(!matches_query(&p, "G2"));
    }

    #[test]
    fn test_matches_name_substring() {
        let p = product("F100", "Sky Rocket");
        assert!(matches_query(&p, "rock"));
        assert!(matches_query(&p, "SKY"));
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let p = product("F100", "Rocket");
        assert!(!matches_query(&p, ""));
        assert!(!matches_query(&p, "   "));
    }

    #[test]
    fn test_filter_caps_results() {
        let catalog: Vec<Product> = (0..30)
            .map(|i| product(&format!("F{i}"), "Rocket"))
            .collect();
        let results = filter_catalog(&catalog, "rocket");
        assert_eq!(results.len(), MAX_SEARCH_RESULTS);
    }

    #[test]
    fn test_filter_orders_naturally() {
        let catalog = vec![
            product("F100", "Rocket"),
            product("F9", "Rocket"),
            product("F10", "Rocket"),
        ];
        let results = filter_catalog(&catalog, "f1");
        let codes: Vec<&str> = results.iter().map(|p| p.code.as_str()).collect();
        // "F9" does not contain "f1"
        assert_eq!(codes, vec!["F10", "F100"]);
    }
}
