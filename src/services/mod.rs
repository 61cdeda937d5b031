//! Service layer
//!
//! Business rules on top of the domain models. Services borrow the
//! `Storage` and take the wallet they operate on explicitly; every
//! mutating call persists the wallet before returning.

pub mod budget;
pub mod category;
pub mod import;
pub mod user;
pub mod wallet;

pub use budget::{BudgetService, TrackedCategory};
pub use category::CategoryService;
pub use import::{ImportError, ImportResult, ImportService};
pub use user::UserService;
pub use wallet::{Alert, TransactionFilter, WalletService};
