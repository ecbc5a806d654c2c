//! Product catalog repository
//!
//! PostgreSQL adapter for `domain_inventory::InventoryStore`. Partial
//! updates lock the row, run the domain patch validation, and write the
//! result back, so API-level and storage-level rules cannot drift apart.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use core_kernel::{natural_cmp, Money, PortError, ProductCode};
use domain_inventory::{
    InventoryError, InventoryStore, NewProduct, Product, ProductPatch, MAX_SEARCH_RESULTS,
};

use crate::error::storage;

/// Repository for the product catalog
#[derive(Debug, Clone)]
pub struct PgInventoryStore {
    pool: PgPool,
}

impl PgInventoryStore {
    /// Creates a new store backed by the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row for a product
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub code: String,
    pub name: String,
    pub price: Decimal,
    pub retail_price: Decimal,
    pub stock: i64,
}

impl ProductRow {
    pub(crate) fn into_product(self) -> Result<Product, PortError> {
        let code = ProductCode::new(&self.code)
            .map_err(|e| PortError::internal(format!("corrupt product code: {e}")))?;
        Ok(Product {
            code,
            name: self.name,
            price: Money::new(self.price),
            retail_price: Money::new(self.retail_price),
            stock: self.stock,
        })
    }
}

/// Escapes LIKE wildcards so user queries match literally
fn like_pattern(query: &str) -> String {
    let escaped = query
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl InventoryStore for PgInventoryStore {
    async fn create_product(&self, new: NewProduct) -> Result<Product, InventoryError> {
        let product = new.into_product();

        let result = sqlx::query(
            r#"
            INSERT INTO products (code, name, price, retail_price, stock)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(product.code.as_str())
        .bind(&product.name)
        .bind(product.price.amount())
        .bind(product.retail_price.amount())
        .bind(product.stock)
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(InventoryError::DuplicateCode {
                code: product.code,
            });
        }

        tracing::info!(code = %product.code, "product created");
        Ok(product)
    }

    async fn get_product(&self, code: &ProductCode) -> Result<Product, InventoryError> {
        let row: Option<ProductRow> = sqlx::query_as(
            "SELECT code, name, price, retail_price, stock FROM products WHERE code = $1",
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        match row {
            Some(row) => Ok(row.into_product()?),
            None => Err(InventoryError::ProductNotFound { code: code.clone() }),
        }
    }

    async fn list_products(&self) -> Result<Vec<Product>, InventoryError> {
        let rows: Vec<ProductRow> =
            sqlx::query_as("SELECT code, name, price, retail_price, stock FROM products")
                .fetch_all(&self.pool)
                .await
                .map_err(storage)?;

        let mut products = rows
            .into_iter()
            .map(ProductRow::into_product)
            .collect::<Result<Vec<_>, _>>()?;
        products.sort_by(|a, b| natural_cmp(a.code.as_str(), b.code.as_str()));
        Ok(products)
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>, InventoryError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT code, name, price, retail_price, stock
            FROM products
            WHERE code ILIKE $1 OR name ILIKE $1
            LIMIT $2
            "#,
        )
        .bind(like_pattern(query))
        .bind(MAX_SEARCH_RESULTS as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        let mut products = rows
            .into_iter()
            .map(ProductRow::into_product)
            .collect::<Result<Vec<_>, _>>()?;
        products.sort_by(|a, b| natural_cmp(a.code.as_str(), b.code.as_str()));
        Ok(products)
    }

    async fn update_product(
        &self,
        code: &ProductCode,
        patch: ProductPatch,
    ) -> Result<Product, InventoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT code, name, price, retail_price, stock
            FROM products WHERE code = $1
            FOR UPDATE
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage)?;

        let mut product = match row {
            Some(row) => row.into_product()?,
            None => return Err(InventoryError::ProductNotFound { code: code.clone() }),
        };

        patch.apply(&mut product)?;

        sqlx::query(
            r#"
            UPDATE products
            SET name = $2, price = $3, retail_price = $4, stock = $5
            WHERE code = $1
            "#,
        )
        .bind(product.code.as_str())
        .bind(&product.name)
        .bind(product.price.amount())
        .bind(product.retail_price.amount())
        .bind(product.stock)
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

        tx.commit().await.map_err(storage)?;

        tracing::info!(code = %product.code, "product updated");
        Ok(product)
    }

    async fn delete_product(&self, code: &ProductCode) -> Result<(), InventoryError> {
        let result = sqlx::query("DELETE FROM products WHERE code = $1")
            .bind(code.as_str())
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(InventoryError::ProductNotFound { code: code.clone() });
        }

        tracing::info!(%code, "product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern(" F100 "), "%F100%");
    }
}
