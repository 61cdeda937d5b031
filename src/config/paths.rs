//! Path management for the finance manager
//!
//! ## Path Resolution Order
//!
//! 1. `--data-dir` command-line argument
//! 2. `FINANCE_MANAGER_DATA_DIR` environment variable (if set)
//! 3. The platform config directory (`~/.config/finance-manager` on Linux)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{FinanceError, FinanceResult};

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "FINANCE_MANAGER_DATA_DIR";

/// Manages all paths used by the finance manager
#[derive(Debug, Clone)]
pub struct FinancePaths {
    base_dir: PathBuf,
}

impl FinancePaths {
    /// Resolve the base directory from the environment or the platform default
    pub fn new() -> FinanceResult<Self> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Use an explicit base directory when given, otherwise resolve as `new`
    pub fn resolve(explicit: Option<PathBuf>) -> FinanceResult<Self> {
        match explicit {
            Some(base_dir) => Ok(Self::with_base_dir(base_dir)),
            None => Self::new(),
        }
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// `<base>/data/`
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// `<base>/data/wallets/`
    pub fn wallets_dir(&self) -> PathBuf {
        self.data_dir().join("wallets")
    }

    /// `<base>/data/users.json`
    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    /// `<base>/data/wallets/<login>.json`
    pub fn wallet_file(&self, login: &str) -> PathBuf {
        self.wallets_dir().join(format!("{}.json", login))
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Ensure the base, data and wallets directories exist
    pub fn ensure_directories(&self) -> FinanceResult<()> {
        std::fs::create_dir_all(self.wallets_dir())
            .map_err(|e| FinanceError::Io(format!("Failed to create data directory: {}", e)))?;
        Ok(())
    }
}

fn resolve_default_path() -> FinanceResult<PathBuf> {
    ProjectDirs::from("", "", "finance-manager")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| FinanceError::Config("Could not determine home directory".into()))
}
