//! Finance Manager - terminal personal finance tracker
//!
//! Each user owns one wallet holding an income/expense log and per-category
//! spending budgets. Budgets are created on the first expense in a category
//! and keep their `spent` total in step with the log.
//!
//! # Architecture
//!
//! - `models`: domain types (money, categories, budgets, transactions, wallets, users)
//! - `storage`: user and wallet stores (JSON files or in memory)
//! - `services`: business rules (categories, budgets, recording, import, users)
//! - `audit`: append-only audit log of mutations
//! - `export`: CSV export
//! - `display`: table formatting
//! - `cli`: interactive command shell
//!
//! # Example
//!
//! ```rust,ignore
//! use finance_manager::models::{Money, Wallet};
//! use finance_manager::services::{CategoryService, WalletService};
//! use finance_manager::storage::Storage;
//!
//! let storage = Storage::in_memory();
//! let mut wallet = Wallet::new("alice", Money::from_parts(1000, 0))?;
//! let food = CategoryService::new(&storage).resolve(&wallet, "Food")?;
//! WalletService::new(&storage).add_expense(&mut wallet, Money::from_parts(200, 0), &food, None)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{FinanceError, FinanceResult};
