//! Export module
//!
//! CSV export of filtered transactions; the import side lives in
//! `services::import` and reads the same format.

pub mod csv;

pub use csv::{export_transactions_csv, CSV_HEADER};
