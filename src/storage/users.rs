//! User store backed by `data/users.json`
//!
//! Only credentials are kept in the users file; each user's wallet is
//! read from and written to the wallet store.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{FinanceError, FinanceResult};
use crate::models::User;

use super::file_io::{read_json, write_json_atomic};
use super::{assemble_user, UserStore, WalletStore};

/// One row of the users file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CredentialRecord {
    pub login: String,
    pub password_hash: String,
}

/// JSON file user persistence
pub struct JsonUserStore {
    path: PathBuf,
    credentials: RwLock<BTreeMap<String, String>>,
    wallets: Arc<dyn WalletStore>,
}

impl JsonUserStore {
    /// Open the users file, loading existing credentials
    pub fn open(path: PathBuf, wallets: Arc<dyn WalletStore>) -> FinanceResult<Self> {
        let store = Self {
            path,
            credentials: RwLock::new(BTreeMap::new()),
            wallets,
        };
        store.load()?;
        Ok(store)
    }

    /// Reload credentials from disk
    pub fn load(&self) -> FinanceResult<()> {
        let records: Vec<CredentialRecord> = read_json(&self.path)?;

        let mut credentials = self.credentials.write().map_err(|e| {
            FinanceError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        credentials.clear();
        for record in records {
            credentials.insert(record.login, record.password_hash);
        }
        tracing::debug!(users = credentials.len(), "loaded users file");

        Ok(())
    }

    fn persist(&self, credentials: &BTreeMap<String, String>) -> FinanceResult<()> {
        let records: Vec<CredentialRecord> = credentials
            .iter()
            .map(|(login, hash)| CredentialRecord {
                login: login.clone(),
                password_hash: hash.clone(),
            })
            .collect();
        write_json_atomic(&self.path, &records)
    }
}

impl UserStore for JsonUserStore {
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
            self.persist(&credentials)?;
        }
        self.wallets.save(user.login(), user.wallet())
    }

    fn exists(&self, login: &str) -> FinanceResult<bool> {
        let credentials = self.credentials.read().map_err(|e| {
            FinanceError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(credentials.contains_key(login))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Wallet};
    use crate::storage::JsonWalletStore;
    use tempfile::TempDir;

    fn open(temp_dir: &TempDir) -> JsonUserStore {
        let wallets = Arc::new(JsonWalletStore::new(temp_dir.path().join("wallets")));
        JsonUserStore::open(temp_dir.path().join("users.json"), wallets).unwrap()
    }

    #[test]
    fn test_save_and_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let store = open(&temp_dir);

        let wallet = Wallet::new("alice", Money::from_parts(250, 0)).unwrap();
        let user = User::new("alice", "$argon2id$fake".into(), wallet).unwrap();
        store.save(&user).unwrap();
        assert!(store.exists("alice").unwrap());

        let reopened = open(&temp_dir);
        let found = reopened.find_by_login("alice").unwrap().unwrap();
        assert_eq!(found, user);
        assert!(reopened.find_by_login("bob").unwrap().is_none());
    }

    #[test]
    fn test_login_is_case_sensitive() {
        let temp_dir = TempDir::new().unwrap();
        let store = open(&temp_dir);

        let wallet = Wallet::new("alice", Money::zero()).unwrap();
        store
            .save(&User::new("alice", "h".into(), wallet).unwrap())
            .unwrap();

        assert!(!store.exists("Alice").unwrap());
    }

    #[test]
    fn test_missing_wallet_file_gives_empty_wallet() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("users.json"),
            r#"[{"login": "carol", "password_hash": "h"}]"#,
        )
        .unwrap();

        let store = open(&temp_dir);
        let carol = store.find_by_login("carol").unwrap().unwrap();
        assert!(carol.wallet().balance().is_zero());
        assert!(carol.wallet().transactions().is_empty());
    }
}
