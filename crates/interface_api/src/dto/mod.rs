//! Request/Response data transfer objects
//!
//! Wire names stay camelCase for compatibility with the existing POS
//! frontend. Requests are explicit structs: client-supplied fields that the
//! server derives itself (line totals, grand totals, name snapshots) are
//! simply not part of the schema and can never reach the stored records.

pub mod product;
pub mod bill;
