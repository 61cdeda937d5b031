//! Storage layer
//!
//! Persistence is modeled as two key-value stores keyed by user login:
//! `UserStore` for credentials and `WalletStore` for wallets. The JSON
//! backend writes atomically; the in-memory backend is used by tests.

pub mod file_io;
pub mod memory;
pub mod users;
pub mod wallets;

pub use memory::{MemoryUserStore, MemoryWalletStore};
pub use users::JsonUserStore;
pub use wallets::JsonWalletStore;

use std::sync::Arc;

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::FinancePaths;
use crate::error::FinanceResult;
use crate::models::{User, Wallet};

/// Lookup and persistence of users (credentials plus wallet)
pub trait UserStore {
    fn find_by_login(&self, login: &str) -> FinanceResult<Option<User>>;

    /// Persist the user's credentials and wallet
    fn save(&self, user: &User) -> FinanceResult<()>;

    fn exists(&self, login: &str) -> FinanceResult<bool>;
}

/// Lookup and persistence of wallets by owner login
pub trait WalletStore {
    fn find_by_owner(&self, login: &str) -> FinanceResult<Option<Wallet>>;

    fn save(&self, login: &str, wallet: &Wallet) -> FinanceResult<()>;
}

/// Build a `User` from a credential row and its stored wallet
///
/// A user whose wallet file is missing gets an empty zero-balance wallet.
pub(crate) fn assemble_user(
    login: &str,
    password_hash: String,
    wallets: &dyn WalletStore,
) -> FinanceResult<User> {
    let wallet = match wallets.find_by_owner(login)? {
        Some(wallet) => wallet,
        None => {
            tracing::warn!(login, "no stored wallet for user, starting empty");
            Wallet::new(login, crate::models::Money::zero())?
        }
    };
    User::new(login, password_hash, wallet)
}

/// Storage coordinator: the user and wallet stores plus the audit log
pub struct Storage {
    paths: Option<FinancePaths>,
    pub users: Box<dyn UserStore>,
    pub wallets: Arc<dyn WalletStore>,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// JSON-file storage under `paths`, creating directories as needed
    pub fn new(paths: FinancePaths) -> FinanceResult<Self> {
        paths.ensure_directories()?;

        let wallets: Arc<dyn WalletStore> = Arc::new(JsonWalletStore::new(paths.wallets_dir()));
        let users = JsonUserStore::open(paths.users_file(), Arc::clone(&wallets))?;

        Ok(Self {
            audit: Some(AuditLogger::new(paths.audit_log())),
            users: Box::new(users),
            wallets,
            paths: Some(paths),
        })
    }

    /// Ephemeral storage with no audit log
    pub fn in_memory() -> Self {
        let wallets: Arc<dyn WalletStore> = Arc::new(MemoryWalletStore::new());
        Self {
            users: Box::new(MemoryUserStore::new(Arc::clone(&wallets))),
            wallets,
            paths: None,
            audit: None,
        }
    }

    /// Disable audit logging (e.g. when turned off in settings)
    pub fn without_audit(mut self) -> Self {
        self.audit = None;
        self
    }

    /// Paths of the JSON backend; `None` for in-memory storage
    pub fn paths(&self) -> Option<&FinancePaths> {
        self.paths.as_ref()
    }

    pub fn audit(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Persist a wallet under its owner's login
    pub fn save_wallet(&self, wallet: &Wallet) -> FinanceResult<()> {
        self.wallets.save(wallet.owner_login(), wallet)
    }

    /// Write an audit entry; failures are logged, never propagated
    pub fn log_entry(&self, entry: AuditEntry) {
        if let Some(audit) = &self.audit {
            if let Err(e) = audit.log(&entry) {
                tracing::warn!(error = %e, "failed to write audit entry");
            }
        }
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        if self.audit.is_some() {
            self.log_entry(AuditEntry::create(
                entity_type,
                entity_id,
                entity_name,
                entity,
            ));
        }
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) {
        if self.audit.is_none() {
            return;
        }
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        self.log_entry(AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::{Category, CategoryBudget, Money};
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").join("wallets").exists());
        assert!(storage.paths().is_some());
        assert!(storage.audit().is_some());
    }

    #[test]
    fn test_save_wallet_uses_owner_login() {
        let storage = Storage::in_memory();
        let wallet = Wallet::new("erin", Money::from_parts(5, 0)).unwrap();
        storage.save_wallet(&wallet).unwrap();

        assert_eq!(storage.wallets.find_by_owner("erin").unwrap(), Some(wallet));
    }

    #[test]
    fn test_log_update_writes_diff() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        let food = Category::new("Food").unwrap();
        let before = CategoryBudget::new(food.clone(), Money::zero()).unwrap();
        let after = CategoryBudget::new(food, Money::from_parts(300, 0)).unwrap();
        storage.log_update(
            EntityType::CategoryBudget,
            "erin/food",
            Some("Food".into()),
            &before,
            &after,
        );

        let entries = storage.audit().unwrap().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Update);
        assert_eq!(
            entries[0].diff_summary.as_deref(),
            Some("limit: \"0\" -> \"300\"")
        );
    }

    #[test]
    fn test_without_audit() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap().without_audit();

        storage.log_create(EntityType::User, "x", None, &"x");
        assert!(!temp_dir.path().join("audit.log").exists());
    }
}
