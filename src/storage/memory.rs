//! In-memory stores for tests and throwaway sessions

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::error::{FinanceError, FinanceResult};
use crate::models::{User, Wallet};

use super::{assemble_user, UserStore, WalletStore};

/// Wallets kept in a map keyed by owner login
#[derive(Default)]
pub struct MemoryWalletStore {
    wallets: RwLock<HashMap<String, Wallet>>,
}

impl MemoryWalletStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WalletStore for MemoryWalletStore {
    fn find_by_owner(&self, login: &str) -> FinanceResult<Option<Wallet>> {
        let wallets = self
            .wallets
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(wallets.get(login).cloned())
    }

    fn save(&self, login: &str, wallet: &Wallet) -> FinanceResult<()> {
        let mut wallets = self
            .wallets
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        wallets.insert(login.to_string(), wallet.clone());
        Ok(())
    }
}

/// Credentials kept in memory; wallets go to the shared wallet store
pub struct MemoryUserStore {
    credentials: RwLock<BTreeMap<String, String>>,
    wallets: Arc<dyn WalletStore>,
}

impl MemoryUserStore {
    pub fn new(wallets: Arc<dyn WalletStore>) -> Self {
        Self {
            credentials: RwLock::new(BTreeMap::new()),
            wallets,
        }
    }
}

impl UserStore for MemoryUserStore {
    fn find_by_login(&self, login: &str) -> FinanceResult<Option<User>> {
        let hash = {
            let credentials = self.credentials.read().map_err(|e| {
                FinanceError::Storage(format!("Failed to acquire read lock: {}", e))
            })?;
            credentials.get(login).cloned()
        };

        match hash {
            Some(hash) => assemble_user(login, hash, self.wallets.as_ref()).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, user: &User) -> FinanceResult<()> {
        {
            let mut credentials = self.credentials.write().map_err(|e| {
                FinanceError::Storage(format!("Failed to acquire write lock: {}", e))
            })?;
            credentials.insert(user.login().to_string(), user.password_hash().to_string());
        }
        self.wallets.save(user.login(), user.wallet())
    }

    fn exists(&self, login: &str) -> FinanceResult<bool> {
        let credentials = self
            .credentials
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(credentials.contains_key(login))
    }
}
