//! User model

use std::fmt;

use super::wallet::Wallet;
use crate::error::{FinanceError, FinanceResult};

/// A registered user together with the wallet they own
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    login: String,
    password_hash: String,
    wallet: Wallet,
}

impl User {
    /// Assemble a user; the wallet must belong to `login`
    pub fn new(login: &str, password_hash: String, wallet: Wallet) -> FinanceResult<Self> {
        validate_login(login)?;
        if wallet.owner_login() != login {
            return Err(FinanceError::InvalidInput(format!(
                "Wallet of '{}' cannot be attached to user '{}'",
                wallet.owner_login(),
                login
            )));
        }
        Ok(Self {
            login: login.to_string(),
            password_hash,
            wallet,
        })
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn wallet_mut(&mut self) -> &mut Wallet {
        &mut self.wallet
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.login)
    }
}

/// Check that a login is usable as a file name
///
/// Allowed: ASCII letters, digits, `_`, `-`, `.`; must not start with `.`.
pub fn validate_login(login: &str) -> FinanceResult<()> {
    if login.trim().is_empty() {
        return Err(FinanceError::InvalidInput("Login cannot be empty".into()));
    }
    if login.starts_with('.') {
        return Err(FinanceError::InvalidInput(
            "Login cannot start with '.'".into(),
        ));
    }
    if let Some(c) = login
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(FinanceError::InvalidInput(format!(
            "Login contains invalid character: '{}'",
            c
        )));
    }
    Ok(())
}
