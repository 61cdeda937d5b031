//! Display formatting for terminal output
//!
//! Renders wallets, budgets and transaction listings as plain-text tables
//! for the interactive shell.

pub mod budget;
pub mod category;
pub mod summary;
pub mod transaction;

pub use budget::format_budget_table;
pub use category::format_category_list;
pub use summary::{format_summary, Summary};
pub use transaction::{format_transaction_table, format_filtered_totals};
