//! Wallet store backed by one JSON file per user
//!
//! Wallets live in `data/wallets/<login>.json`.

use std::path::PathBuf;

use crate::error::FinanceResult;
use crate::models::user::validate_login;
use crate::models::Wallet;

use super::file_io::{read_json_optional, write_json_atomic};
use super::WalletStore;

/// JSON-per-user wallet persistence
pub struct JsonWalletStore {
    dir: PathBuf,
}

impl JsonWalletStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn file_for(&self, login: &str) -> FinanceResult<PathBuf> {
        // The login names a file, so it must not escape the directory
        validate_login(login)?;
        Ok(self.dir.join(format!("{}.json", login)))
    }
}

impl WalletStore for JsonWalletStore {
    fn find_by_owner(&self, login: &str) -> FinanceResult<Option<Wallet>> {
        let path = self.file_for(login)?;
        let wallet: Option<Wallet> = read_json_optional(&path)?;
        tracing::debug!(login, found = wallet.is_some(), path = %path.display(), "loaded wallet");
        Ok(wallet)
    }

    fn save(&self, login: &str, wallet: &Wallet) -> FinanceResult<()> {
        let path = self.file_for(login)?;
        write_json_atomic(&path, wallet)?;
        tracing::debug!(
            login,
            transactions = wallet.transactions().len(),
            budgets = wallet.budget_count(),
            "saved wallet"
        );
        Ok(())
    }
}
