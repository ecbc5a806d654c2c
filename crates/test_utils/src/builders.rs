//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the relevant fields and take defaults for the rest.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Money, ProductCode};
use domain_billing::{BillUpdate, NewBill, NewLineItem};
use domain_inventory::NewProduct;

/// Builder for test products
pub struct ProductBuilder {
    code: String,
    name: String,
    price: Decimal,
    retail_price: Decimal,
    stock: i64,
}

impl Default for ProductBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductBuilder {
    /// Creates a builder with default values
    pub fn new() -> Self {
        Self {
            code: "F100".to_string(),
            name: "Rocket".to_string(),
            price: dec!(50),
            retail_price: dec!(70),
            stock: 20,
        }
    }

    /// Sets the product code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the wholesale price
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = price;
        self
    }

    /// Sets the retail price
    pub fn with_retail_price(mut self, retail_price: Decimal) -> Self {
        self.retail_price = retail_price;
        self
    }

    /// Sets the stock count
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    /// Builds the validated product input
    pub fn build(self) -> NewProduct {
        NewProduct::new(
            ProductCode::new(&self.code).expect("builder code must be valid"),
            self.name,
            Money::new(self.price),
            Money::new(self.retail_price),
            self.stock,
        )
        .expect("builder must produce a valid product")
    }
}

/// Builder for bill inputs (creation and update share the same fields)
pub struct NewBillBuilder {
    customer_name: Option<String>,
    customer_phone: Option<String>,
    items: Vec<NewLineItem>,
    discount: Decimal,
}

impl Default for NewBillBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NewBillBuilder {
    /// Creates an empty bill builder
    pub fn new() -> Self {
        Self {
            customer_name: Some("Walk-in".to_string()),
            customer_phone: None,
            items: Vec::new(),
            discount: dec!(0),
        }
    }

    /// Sets the customer name
    pub fn with_customer(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    /// Sets the customer phone
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.customer_phone = Some(phone.into());
        self
    }

    /// Appends a line item
    pub fn with_item(mut self, code: &str, qty: i64, price: Decimal) -> Self {
        self.items.push(NewLineItem {
            code: ProductCode::new(code).expect("builder code must be valid"),
            qty,
            price: Money::new(price),
        });
        self
    }

    /// Sets the discount
    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.discount = discount;
        self
    }

    /// Builds a creation input
    pub fn build(self) -> NewBill {
        NewBill {
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            items: self.items,
            discount: Money::new(self.discount),
        }
    }

    /// Builds an update input with the same fields
    pub fn build_update(self) -> BillUpdate {
        BillUpdate {
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            items: self.items,
            discount: Money::new(self.discount),
        }
    }
}
