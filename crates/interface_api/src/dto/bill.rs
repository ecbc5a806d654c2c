//! Bill DTOs
//!
//! Creation and update requests carry only code, quantity, and the chosen
//! unit price per item. Item names are snapshotted from the catalog and
//! totals are recomputed server-side; any totals a client sends are ignored
//! by the schema.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{Money, ProductCode};
use domain_billing::{Bill, BillClass, BillUpdate, LineItem, NewBill, NewLineItem};

use crate::error::ApiError;

/// One requested line item
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillItemRequest {
    pub code: String,
    pub qty: i64,
    pub price: Decimal,
}

impl BillItemRequest {
    fn into_domain(self) -> Result<NewLineItem, ApiError> {
        Ok(NewLineItem {
            code: ProductCode::new(&self.code)?,
            qty: self.qty,
            price: Money::new(self.price),
        })
    }
}

/// Request body for creating a bill
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillRequest {
    #[validate(length(max = 200))]
    pub customer_name: Option<String>,
    #[validate(length(max = 32))]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub items: Vec<BillItemRequest>,
    #[serde(default)]
    pub discount: Decimal,
}

impl CreateBillRequest {
    pub fn into_domain(self) -> Result<NewBill, ApiError> {
        Ok(NewBill {
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            items: self
                .items
                .into_iter()
                .map(BillItemRequest::into_domain)
                .collect::<Result<_, _>>()?,
            discount: Money::new(self.discount),
        })
    }
}

/// Request body for updating a bill
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBillRequest {
    #[validate(length(max = 200))]
    pub customer_name: Option<String>,
    #[validate(length(max = 32))]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub items: Vec<BillItemRequest>,
    #[serde(default)]
    pub discount: Decimal,
}

impl UpdateBillRequest {
    pub fn into_domain(self) -> Result<BillUpdate, ApiError> {
        Ok(BillUpdate {
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            items: self
                .items
                .into_iter()
                .map(BillItemRequest::into_domain)
                .collect::<Result<_, _>>()?,
            discount: Money::new(self.discount),
        })
    }
}

/// One stored line item
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillItemResponse {
    pub code: String,
    pub name: String,
    pub qty: i64,
    pub price: Decimal,
    pub total: Decimal,
}

impl From<LineItem> for BillItemResponse {
    fn from(item: LineItem) -> Self {
        Self {
            code: item.code.to_string(),
            name: item.name,
            qty: item.qty,
            price: item.price.amount(),
            total: item.total.amount(),
        }
    }
}

/// Bill representation returned to clients
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillResponse {
    pub invoice_no: i64,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub date: DateTime<Utc>,
    pub items: Vec<BillItemResponse>,
    pub discount: Decimal,
    pub grand_total: Decimal,
}

impl From<Bill> for BillResponse {
    fn from(bill: Bill) -> Self {
        Self {
            invoice_no: bill.invoice_no.value(),
            customer_name: bill.customer_name,
            customer_phone: bill.customer_phone,
            date: bill.date,
            items: bill.items.into_iter().map(BillItemResponse::from).collect(),
            discount: bill.discount.amount(),
            grand_total: bill.grand_total.amount(),
        }
    }
}

/// Body returned by the classify endpoint
#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    #[serde(rename = "type")]
    pub kind: BillClass,
}
