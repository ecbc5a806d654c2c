//! Product DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{Money, ProductCode};
use domain_inventory::{NewProduct, Product, ProductPatch};

use crate::error::ApiError;

/// Request body for creating a product
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub price: Decimal,
    pub retail_price: Decimal,
    #[validate(range(min = 0))]
    pub stock: i64,
}

impl CreateProductRequest {
    /// Converts into the validated domain input
    pub fn into_domain(self) -> Result<NewProduct, ApiError> {
        let code = ProductCode::new(&self.code)?;
        NewProduct::new(
            code,
            self.name,
            Money::new(self.price),
            Money::new(self.retail_price),
            self.stock,
        )
        .map_err(ApiError::from)
    }
}

/// Request body for partially updating a product
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub retail_price: Option<Decimal>,
    pub stock: Option<i64>,
}

impl UpdateProductRequest {
    pub fn into_patch(self) -> ProductPatch {
        ProductPatch {
            name: self.name,
            price: self.price.map(Money::new),
            retail_price: self.retail_price.map(Money::new),
            stock: self.stock,
        }
    }
}

/// Query string for product search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Product representation returned to clients
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub code: String,
    pub name: String,
    pub price: Decimal,
    pub retail_price: Decimal,
    pub stock: i64,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            code: product.code.to_string(),
            name: product.name,
            price: product.price.amount(),
            retail_price: product.retail_price.amount(),
            stock: product.stock,
        }
    }
}

/// Body returned by delete endpoints
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}
