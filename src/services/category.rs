//! Category service
//!
//! Name-based category lookup and rename propagation. Resolution is pure:
//! it never inserts anything into the wallet. A category only becomes
//! tracked through the budget service.

use crate::audit::EntityType;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Category, CategoryBudget, Wallet};
use crate::storage::Storage;

/// Service for category lookup and renaming
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Map a name to the wallet's existing category, or a fresh candidate
    ///
    /// Budget keys are searched first, then transaction categories. The
    /// existing category keeps its original casing. The wallet is not
    /// modified.
    pub fn resolve(&self, wallet: &Wallet, name: &str) -> FinanceResult<Category> {
        let candidate = Category::new(name)?;
        Ok(self
            .find_by_name(wallet, candidate.name())
            .unwrap_or(candidate))
    }

    /// Existing category with this name, budgets first, then transactions
    pub fn find_by_name(&self, wallet: &Wallet, name: &str) -> Option<Category> {
        if let Some(budget) = wallet.budget_by_name(name) {
            return Some(budget.category().clone());
        }
        wallet
            .transactions()
            .iter()
            .map(|txn| txn.category())
            .find(|category| category.matches_name(name))
            .cloned()
    }

    /// The budget-bearing category equal to `category`, if any
    ///
    /// Transaction-only categories are ignored.
    pub fn find_in_budgets(&self, wallet: &Wallet, category: &Category) -> Option<Category> {
        wallet
            .category_budget(category)
            .map(|budget| budget.category().clone())
    }

    /// All budget-bearing categories, sorted by name
    pub fn list_categories(&self, wallet: &Wallet) -> Vec<Category> {
        wallet.budgets().map(|b| b.category().clone()).collect()
    }

    /// Rename `old` to `new_name` across the transaction log and budgets
    ///
    /// Renaming to a different existing category is rejected. A rename
    /// that only changes the casing is allowed. Returns the new category.
    pub fn rename(
        &self,
        wallet: &mut Wallet,
        old: &Category,
        new_name: &str,
    ) -> FinanceResult<Category> {
        let renamed = Category::new(new_name)?;

        if let Some(existing) = self.find_by_name(wallet, renamed.name()) {
            if &existing != old {
                return Err(FinanceError::duplicate_category(existing.name()));
            }
        }

        let matching: Vec<_> = wallet
            .iter_transactions()
            .filter(|(_, txn)| txn.category() == old)
            .map(|(id, txn)| (id, txn.with_category(renamed.clone())))
            .collect();
        let moved = matching.len();

        for (id, replacement) in matching {
            wallet.replace_transaction(id, replacement)?;
        }

        if let Some(budget) = wallet.category_budget(old).cloned() {
            let replacement =
                CategoryBudget::with_spent(renamed.clone(), budget.limit(), budget.spent())?;
            wallet.replace_category_in_budget(old, replacement)?;
        }

        self.storage.save_wallet(wallet)?;

        tracing::info!(
            owner = wallet.owner_login(),
            from = old.name(),
            to = renamed.name(),
            transactions = moved,
            "renamed category"
        );
        self.storage.log_update(
            EntityType::Category,
            format!("{}/{}", wallet.owner_login(), old.normalized()),
            Some(renamed.name().to_string()),
            old,
            &renamed,
        );

        Ok(renamed)
    }
}
