//! User service
//!
//! Registration, login and saving a user's state on exit.

use serde_json::json;

use crate::audit::EntityType;
use crate::crypto::PasswordHasher;
use crate::error::{FinanceError, FinanceResult};
use crate::models::user::validate_login;
use crate::models::{Money, User, Wallet};
use crate::storage::Storage;

/// Service for user accounts
pub struct UserService<'a> {
    storage: &'a Storage,
    hasher: PasswordHasher,
}

impl<'a> UserService<'a> {
    /// Create a user service with default hashing cost
    pub fn new(storage: &'a Storage) -> Self {
        Self::with_hasher(storage, PasswordHasher::new())
    }

    pub fn with_hasher(storage: &'a Storage, hasher: PasswordHasher) -> Self {
        Self { storage, hasher }
    }

    /// Register a new user with a fresh wallet
    pub fn register(
        &self,
        login: &str,
        raw_password: &str,
        initial_balance: Money,
    ) -> FinanceResult<User> {
        let login = login.trim();
        validate_login(login)?;

        if self.storage.users.exists(login)? {
            return Err(FinanceError::duplicate_user(login));
        }

        if raw_password.trim().is_empty() {
            return Err(FinanceError::InvalidInput(
                "Password cannot be blank".into(),
            ));
        }

        let wallet = Wallet::new(login, initial_balance)?;
        let user = User::new(login, self.hasher.hash(raw_password)?, wallet)?;
        self.storage.users.save(&user)?;

        tracing::info!(login, "registered user");
        self.storage.log_create(
            EntityType::User,
            login,
            None,
            &json!({ "login": login, "initial_balance": initial_balance }),
        );

        Ok(user)
    }

    /// Authenticate; unknown login and wrong password fail the same way
    pub fn login(&self, login: &str, raw_password: &str) -> FinanceResult<User> {
        let login = login.trim();
        let Some(user) = self.storage.users.find_by_login(login)? else {
            tracing::debug!(login, "login for unknown user");
            return Err(FinanceError::InvalidCredentials);
        };

        if !self.hasher.matches(raw_password, user.password_hash()) {
            tracing::debug!(login, "login with wrong password");
            return Err(FinanceError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Persist the user's credentials and wallet
    pub fn save(&self, user: &User) -> FinanceResult<()> {
        self.storage.users.save(user)
    }
}
