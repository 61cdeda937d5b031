//! Core data models for the finance manager
//!
//! Pure domain types with no I/O: money, categories, transactions, budgets,
//! the wallet aggregate and users.

pub mod budget;
pub mod category;
pub mod money;
pub mod transaction;
pub mod user;
pub mod wallet;

pub use budget::CategoryBudget;
pub use category::Category;
pub use money::{Money, MoneyParseError};
pub use transaction::{Transaction, TransactionId, TransactionType};
pub use user::User;
pub use wallet::Wallet;
