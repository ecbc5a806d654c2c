//! Bill repository and the transactional reconciliation path
//!
//! PostgreSQL adapter for `domain_billing::BillStore`. Every mutation is a
//! single transaction shaped the same way:
//!
//! 1. take the invoice-sequence advisory lock (creation only)
//! 2. lock the affected product rows `FOR UPDATE` in code order
//! 3. run the pure reconciliation planner against the locked snapshot
//! 4. apply the plan with conditional stock updates
//! 5. persist the bill and commit
//!
//! Validation failures roll the transaction back before any write, so a
//! failing line item can never leave stock half-adjusted. Two transactions
//! touching the same product serialize on the row lock; the conditional
//! `stock >= delta` update is the final guard against lost updates.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use core_kernel::{InvoiceNo, Money, PortError, ProductCode};
use domain_billing::{
    bill::{compose_items, grand_total},
    next_invoice_no, plan_creation, plan_reversal, plan_update, Bill, BillStore, BillUpdate,
    BillingError, LineItem, NewBill, ReconciliationPlan, StockSnapshot,
};

use crate::error::storage;

/// Advisory lock key serializing invoice-number assignment
///
/// Creation transactions take this `pg_advisory_xact_lock` before reading
/// `MAX(invoice_no)`, so two concurrent creations cannot observe the same
/// "next" number.
const INVOICE_SEQUENCE_LOCK: i64 = 0x504f_5321; // "POS!"

/// Repository for bills and their stock reconciliation
#[derive(Debug, Clone)]
pub struct PgBillStore {
    pool: PgPool,
}

impl PgBillStore {
    /// Creates a new store backed by the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row for a bill header
#[derive(Debug, sqlx::FromRow)]
struct BillRow {
    invoice_no: i64,
    customer_name: Option<String>,
    customer_phone: Option<String>,
    bill_date: DateTime<Utc>,
    discount: Decimal,
    grand_total: Decimal,
}

/// Database row for a line item
#[derive(Debug, sqlx::FromRow)]
struct BillItemRow {
    invoice_no: i64,
    code: String,
    name: String,
    qty: i64,
    price: Decimal,
    total: Decimal,
}

impl BillItemRow {
    fn into_line_item(self) -> Result<LineItem, PortError> {
        let code = ProductCode::new(&self.code)
            .map_err(|e| PortError::internal(format!("corrupt line item code: {e}")))?;
        Ok(LineItem {
            code,
            name: self.name,
            qty: self.qty,
            price: Money::new(self.price),
            total: Money::new(self.total),
        })
    }
}

fn assemble_bill(row: BillRow, items: Vec<LineItem>) -> Bill {
    let mut bill = Bill {
        invoice_no: InvoiceNo::new(row.invoice_no),
        customer_name: row.customer_name,
        customer_phone: row.customer_phone,
        date: row.bill_date,
        items,
        discount: Money::new(row.discount),
        grand_total: Money::new(row.grand_total),
    };
    bill.sort_items();
    bill
}

/// Locks the given product rows and snapshots name and stock
///
/// Rows are locked in code order so concurrent reconciliations acquire
/// locks in the same sequence. Codes without a product row simply stay out
/// of the snapshot; the planner decides whether that is an error.
async fn lock_stock_snapshot(
    tx: &mut Transaction<'_, Postgres>,
    codes: &BTreeSet<ProductCode>,
) -> Result<StockSnapshot, PortError> {
    if codes.is_empty() {
        return Ok(StockSnapshot::new());
    }

    let code_args: Vec<String> = codes.iter().map(|c| c.as_str().to_string()).collect();
    let rows: Vec<(String, String, i64)> = sqlx::query_as(
        r#"
        SELECT code, name, stock
        FROM products
        WHERE code = ANY($1)
        ORDER BY code
        FOR UPDATE
        "#,
    )
    .bind(&code_args)
    .fetch_all(&mut **tx)
    .await
    .map_err(storage)?;

    let mut snapshot = StockSnapshot::new();
    for (code, name, stock) in rows {
        let code = ProductCode::new(&code)
            .map_err(|e| PortError::internal(format!("corrupt product code: {e}")))?;
        snapshot.insert(code, name, stock);
    }
    Ok(snapshot)
}

/// Applies a validated plan to the locked product rows
///
/// Positive deltas use a conditional decrement; under the row locks taken
/// during planning the condition cannot fail, so a zero row count is
/// reported as an internal error rather than `InsufficientStock`. Negative
/// deltas restore stock and tolerate rows that have vanished.
async fn apply_plan(
    tx: &mut Transaction<'_, Postgres>,
    plan: &ReconciliationPlan,
) -> Result<(), BillingError> {
    for delta in plan.deltas() {
        if delta.delta > 0 {
            let result = sqlx::query(
                r#"
                UPDATE products
                SET stock = stock - $1
                WHERE code = $2 AND stock >= $1
                "#,
            )
            .bind(delta.delta)
            .bind(delta.code.as_str())
            .execute(&mut **tx)
            .await
            .map_err(storage)?;

            if result.rows_affected() == 0 {
                return Err(BillingError::Storage(PortError::internal(format!(
                    "stock for {} changed under lock",
                    delta.code
                ))));
            }
        } else {
            let result = sqlx::query("UPDATE products SET stock = stock - $1 WHERE code = $2")
                .bind(delta.delta)
                .bind(delta.code.as_str())
                .execute(&mut **tx)
                .await
                .map_err(storage)?;

            if result.rows_affected() == 0 {
                tracing::warn!(
                    code = %delta.code,
                    returned = -delta.delta,
                    "product deleted since billing; stock restoration skipped"
                );
            }
        }
    }
    Ok(())
}

async fn insert_items(
    tx: &mut Transaction<'_, Postgres>,
    invoice_no: InvoiceNo,
    items: &[LineItem],
) -> Result<(), PortError> {
    for (position, item) in items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO bill_items (invoice_no, position, code, name, qty, price, total)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(invoice_no.value())
        .bind(position as i32)
        .bind(item.code.as_str())
        .bind(&item.name)
        .bind(item.qty)
        .bind(item.price.amount())
        .bind(item.total.amount())
        .execute(&mut **tx)
        .await
        .map_err(storage)?;
    }
    Ok(())
}

async fn fetch_items(
    tx: &mut Transaction<'_, Postgres>,
    invoice_no: InvoiceNo,
) -> Result<Vec<LineItem>, PortError> {
    let rows: Vec<BillItemRow> = sqlx::query_as(
        r#"
        SELECT invoice_no, code, name, qty, price, total
        FROM bill_items
        WHERE invoice_no = $1
        ORDER BY position
        "#,
    )
    .bind(invoice_no.value())
    .fetch_all(&mut **tx)
    .await
    .map_err(storage)?;

    rows.into_iter().map(BillItemRow::into_line_item).collect()
}

/// Locks a bill header row, returning `BillNotFound` when absent
async fn lock_bill_row(
    tx: &mut Transaction<'_, Postgres>,
    invoice_no: InvoiceNo,
) -> Result<BillRow, BillingError> {
    let row: Option<BillRow> = sqlx::query_as(
        r#"
        SELECT invoice_no, customer_name, customer_phone, bill_date, discount, grand_total
        FROM bills
        WHERE invoice_no = $1
        FOR UPDATE
        "#,
    )
    .bind(invoice_no.value())
    .fetch_optional(&mut **tx)
    .await
    .map_err(storage)?;

    row.ok_or(BillingError::BillNotFound { invoice_no })
}

#[async_trait]
impl BillStore for PgBillStore {
    async fn create_bill(&self, new: NewBill) -> Result<Bill, BillingError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(INVOICE_SEQUENCE_LOCK)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        let codes: BTreeSet<ProductCode> =
            new.items.iter().map(|item| item.code.clone()).collect();
        let snapshot = lock_stock_snapshot(&mut tx, &codes).await?;

        // Validate everything before anything is written
        let plan = plan_creation(&new.items, &snapshot)?;

        let highest: Option<i64> = sqlx::query_scalar("SELECT MAX(invoice_no) FROM bills")
            .fetch_one(&mut *tx)
            .await
            .map_err(storage)?;
        let invoice_no = next_invoice_no(highest.map(InvoiceNo::new));

        apply_plan(&mut tx, &plan).await?;

        let items = compose_items(&new.items, &snapshot.names())?;
        let total = grand_total(&items, new.discount);
        let date = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO bills (invoice_no, customer_name, customer_phone, bill_date, discount, grand_total)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(invoice_no.value())
        .bind(&new.customer_name)
        .bind(&new.customer_phone)
        .bind(date)
        .bind(new.discount.amount())
        .bind(total.amount())
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

        insert_items(&mut tx, invoice_no, &items).await?;
        tx.commit().await.map_err(storage)?;

        tracing::info!(%invoice_no, item_count = items.len(), "bill created");
        Ok(Bill {
            invoice_no,
            customer_name: new.customer_name,
            customer_phone: new.customer_phone,
            date,
            items,
            discount: new.discount,
            grand_total: total,
        })
    }

    async fn get_bill(&self, invoice_no: InvoiceNo) -> Result<Bill, BillingError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let row: Option<BillRow> = sqlx::query_as(
            r#"
            SELECT invoice_no, customer_name, customer_phone, bill_date, discount, grand_total
            FROM bills
            WHERE invoice_no = $1
            "#,
        )
        .bind(invoice_no.value())
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage)?;

        let row = row.ok_or(BillingError::BillNotFound { invoice_no })?;
        let items = fetch_items(&mut tx, invoice_no).await?;
        tx.commit().await.map_err(storage)?;

        Ok(assemble_bill(row, items))
    }

    async fn list_bills(&self) -> Result<Vec<Bill>, BillingError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let bill_rows: Vec<BillRow> = sqlx::query_as(
            r#"
            SELECT invoice_no, customer_name, customer_phone, bill_date, discount, grand_total
            FROM bills
            ORDER BY invoice_no DESC
            "#,
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(storage)?;

        let item_rows: Vec<BillItemRow> = sqlx::query_as(
            r#"
            SELECT invoice_no, code, name, qty, price, total
            FROM bill_items
            ORDER BY invoice_no, position
            "#,
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(storage)?;
        tx.commit().await.map_err(storage)?;

        let mut items_by_bill: HashMap<i64, Vec<LineItem>> = HashMap::new();
        for row in item_rows {
            let invoice_no = row.invoice_no;
            items_by_bill
                .entry(invoice_no)
                .or_default()
                .push(row.into_line_item()?);
        }

        Ok(bill_rows
            .into_iter()
            .map(|row| {
                let items = items_by_bill.remove(&row.invoice_no).unwrap_or_default();
                assemble_bill(row, items)
            })
            .collect())
    }

    async fn update_bill(
        &self,
        invoice_no: InvoiceNo,
        update: BillUpdate,
    ) -> Result<Bill, BillingError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let row = lock_bill_row(&mut tx, invoice_no).await?;
        let old_items = fetch_items(&mut tx, invoice_no).await?;

        let codes: BTreeSet<ProductCode> = old_items
            .iter()
            .map(|item| item.code.clone())
            .chain(update.items.iter().map(|item| item.code.clone()))
            .collect();
        let snapshot = lock_stock_snapshot(&mut tx, &codes).await?;

        // Validate the full delta set before applying any of it
        let plan = plan_update(&old_items, &update.items, &snapshot)?;
        apply_plan(&mut tx, &plan).await?;

        // Current catalog names win; items whose product vanished keep
        // the snapshot already on the bill
        let mut names: HashMap<ProductCode, String> = old_items
            .iter()
            .map(|item| (item.code.clone(), item.name.clone()))
            .collect();
        names.extend(snapshot.names());

        let items = compose_items(&update.items, &names)?;
        let total = grand_total(&items, update.discount);

        sqlx::query(
            r#"
            UPDATE bills
            SET customer_name = $2, customer_phone = $3, discount = $4, grand_total = $5
            WHERE invoice_no = $1
            "#,
        )
        .bind(invoice_no.value())
        .bind(&update.customer_name)
        .bind(&update.customer_phone)
        .bind(update.discount.amount())
        .bind(total.amount())
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

        sqlx::query("DELETE FROM bill_items WHERE invoice_no = $1")
            .bind(invoice_no.value())
            .execute(&mut *tx)
            .await
            .map_err(storage)?;
        insert_items(&mut tx, invoice_no, &items).await?;

        tx.commit().await.map_err(storage)?;

        tracing::info!(%invoice_no, item_count = items.len(), "bill updated");
        Ok(Bill {
            invoice_no,
            customer_name: update.customer_name,
            customer_phone: update.customer_phone,
            date: row.bill_date,
            items,
            discount: update.discount,
            grand_total: total,
        })
    }

    async fn delete_bill(&self, invoice_no: InvoiceNo) -> Result<(), BillingError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        lock_bill_row(&mut tx, invoice_no).await?;
        let items = fetch_items(&mut tx, invoice_no).await?;

        let codes: BTreeSet<ProductCode> = items.iter().map(|item| item.code.clone()).collect();
        lock_stock_snapshot(&mut tx, &codes).await?;

        let plan = plan_reversal(&items);
        apply_plan(&mut tx, &plan).await?;

        sqlx::query("DELETE FROM bills WHERE invoice_no = $1")
            .bind(invoice_no.value())
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        tx.commit().await.map_err(storage)?;

        tracing::info!(%invoice_no, restored_items = items.len(), "bill deleted, stock restored");
        Ok(())
    }
}
