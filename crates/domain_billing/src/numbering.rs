//! Invoice numbering
//!
//! Numbers start at [`InvoiceNo::FIRST`] and grow by one from the highest
//! number visible at commit time. The computation is pure; stores call it
//! inside the same critical section that persists the bill, so two
//! concurrent creations can never observe the same "next" value.

use core_kernel::InvoiceNo;

/// Returns the next invoice number given the existing ones
pub fn next_invoice_no<I>(existing: I) -> InvoiceNo
where
    I: IntoIterator<Item = InvoiceNo>,
{
    existing
        .into_iter()
        .max()
        .map(|highest| highest.succ())
        .unwrap_or(InvoiceNo::FIRST)
}
