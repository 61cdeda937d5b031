//! Budget service
//!
//! Budget lifecycle, spent recalculation and limit evaluation.
//!
//! `spent` is updated incrementally as expenses are recorded, but
//! `set_budget` always recomputes it from the transaction log. The full
//! recomputation is authoritative.

use rust_decimal::Decimal;

use crate::audit::EntityType;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Category, CategoryBudget, Money, Wallet};
use crate::services::CategoryService;
use crate::storage::Storage;

/// Fraction of the limit at which a budget counts as nearly used up (0.8)
fn near_limit_ratio() -> Decimal {
    Decimal::new(8, 1)
}

/// A category that has a budget entry in the wallet
///
/// Only [`BudgetService::ensure_budget_exists`] hands these out, so holding
/// one proves the category is tracked and carries the wallet's canonical
/// casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedCategory(Category);

impl TrackedCategory {
    pub fn category(&self) -> &Category {
        &self.0
    }
}

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Set the spending limit for a category
    ///
    /// Creates the budget if needed, then recomputes `spent` from the log.
    pub fn set_budget(
        &self,
        wallet: &mut Wallet,
        category: &Category,
        limit: Money,
    ) -> FinanceResult<CategoryBudget> {
        if !limit.is_positive() {
            return Err(FinanceError::InvalidInput(format!(
                "Budget limit must be greater than 0, got {}",
                limit
            )));
        }

        if is_income_only(wallet, category) {
            return Err(FinanceError::IllegalCategory(format!(
                "'{}' is only used for income and cannot have a budget",
                category
            )));
        }

        let resolved = CategoryService::new(self.storage)
            .find_in_budgets(wallet, category)
            .unwrap_or_else(|| category.clone());
        let spent = wallet.expense_total_for(&resolved);

        let before = wallet.category_budget(&resolved).cloned();
        let budget = match wallet.category_budget_mut(&resolved) {
            Some(budget) => {
                budget.set_limit(limit)?;
                budget.set_spent(spent)?;
                budget.clone()
            }
            None => {
                let budget = CategoryBudget::with_spent(resolved.clone(), limit, spent)?;
                wallet.add_category_budget(budget.clone());
                budget
            }
        };

        self.storage.save_wallet(wallet)?;

        let entity_id = budget_entity_id(wallet, &resolved);
        match before {
            Some(before) => self.storage.log_update(
                EntityType::CategoryBudget,
                entity_id,
                Some(resolved.name().to_string()),
                &before,
                &budget,
            ),
            None => self.storage.log_create(
                EntityType::CategoryBudget,
                entity_id,
                Some(resolved.name().to_string()),
                &budget,
            ),
        }
        tracing::debug!(category = %resolved, %limit, %spent, "budget set");

        Ok(budget)
    }

    /// Make sure `category` has a budget entry, creating a zero-limit one
    ///
    /// Idempotent. Persists only when a budget was created.
    pub fn ensure_budget_exists(
        &self,
        wallet: &mut Wallet,
        category: &Category,
    ) -> FinanceResult<TrackedCategory> {
        if let Some(existing) = CategoryService::new(self.storage).find_in_budgets(wallet, category)
        {
            return Ok(TrackedCategory(existing));
        }

        let budget = CategoryBudget::new(category.clone(), Money::zero())?;
        wallet.add_category_budget(budget.clone());
        self.storage.save_wallet(wallet)?;

        self.storage.log_create(
            EntityType::CategoryBudget,
            budget_entity_id(wallet, category),
            Some(category.name().to_string()),
            &budget,
        );
        tracing::debug!(category = %category, "auto-created zero-limit budget");

        Ok(TrackedCategory(category.clone()))
    }

    /// `limit - spent` for the budget of exactly this category
    pub fn remaining_limit(&self, wallet: &Wallet, category: &Category) -> FinanceResult<Money> {
        wallet
            .category_budget(category)
            .map(CategoryBudget::remaining)
            .ok_or_else(|| FinanceError::NoBudgetSet(category.name().to_string()))
    }

    /// `false` without a budget; otherwise `remaining < 0`
    pub fn is_budget_exceeded(&self, wallet: &Wallet, category: &Category) -> bool {
        wallet
            .category_budget(category)
            .is_some_and(|budget| budget.remaining().is_negative())
    }

    /// At least 80 % of a non-zero limit spent, but not exceeded
    pub fn is_budget_near_limit(&self, wallet: &Wallet, category: &Category) -> bool {
        let Some(budget) = wallet.category_budget(category) else {
            return false;
        };
        if budget.limit().is_zero() {
            return false;
        }
        budget.spent() >= budget.limit().scaled(near_limit_ratio())
            && !budget.remaining().is_negative()
    }

    /// Every budget except those on income-only categories, sorted by name
    pub fn all_budgets(&self, wallet: &Wallet) -> Vec<CategoryBudget> {
        wallet
            .budgets()
            .filter(|budget| !is_income_only(wallet, budget.category()))
            .cloned()
            .collect()
    }

    /// Sum of expenses recorded under `category`, straight from the log
    pub fn recalculate_spent(&self, wallet: &Wallet, category: &Category) -> Money {
        wallet.expense_total_for(category)
    }
}

/// A category that has income but never an expense
pub fn is_income_only(wallet: &Wallet, category: &Category) -> bool {
    let mut has_income = false;
    for txn in wallet.transactions() {
        if txn.category() == category {
            if txn.is_expense() {
                return false;
            }
            has_income = true;
        }
    }
    has_income
}

fn budget_entity_id(wallet: &Wallet, category: &Category) -> String {
    format!("{}/{}", wallet.owner_login(), category.normalized())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Transaction, TransactionType};
    use chrono::NaiveDate;

    fn record(wallet: &mut Wallet, kind: TransactionType, amount: i64, category: &str) {
        let when = NaiveDate::from_ymd_opt(2025, 5, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        wallet.add_transaction(
            Transaction::new(
                kind,
                Money::from_parts(amount, 0),
                Category::new(category).unwrap(),
                None,
                when,
            )
            .unwrap(),
        );
    }

    fn cat(name: &str) -> Category {
        Category::new(name).unwrap()
    }

    fn wallet() -> Wallet {
        Wallet::new("alice", Money::from_parts(1000, 0)).unwrap()
    }

    #[test]
    fn test_near_limit_ratio() {
        assert_eq!(near_limit_ratio().to_string(), "0.8");
    }

    #[test]
    fn test_set_budget_rejects_non_positive_limit() {
        let storage = Storage::in_memory();
        let service = BudgetService::new(&storage);
        let mut wallet = wallet();

        for limit in [Money::zero(), Money::from_parts(-10, 0)] {
            let result = service.set_budget(&mut wallet, &cat("Food"), limit);
            assert!(matches!(result, Err(FinanceError::InvalidInput(_))));
        }
        assert_eq!(wallet.budget_count(), 0);
    }

    #[test]
    fn test_set_budget_on_income_only_category() {
        let storage = Storage::in_memory();
        let service = BudgetService::new(&storage);
        let mut wallet = wallet();
        record(&mut wallet, TransactionType::Income, 5000, "Salary");

        let result = service.set_budget(&mut wallet, &cat("salary"), Money::from_parts(100, 0));
        assert!(matches!(result, Err(FinanceError::IllegalCategory(_))));
        assert_eq!(wallet.budget_count(), 0);
    }

    #[test]
    fn test_set_budget_recomputes_spent() {
        let storage = Storage::in_memory();
        let service = BudgetService::new(&storage);
        let mut wallet = wallet();
        record(&mut wallet, TransactionType::Expense, 120, "Food");
        record(&mut wallet, TransactionType::Expense, 80, "FOOD");

        let budget = service
            .set_budget(&mut wallet, &cat("food"), Money::from_parts(1000, 0))
            .unwrap();

        assert_eq!(budget.spent(), Money::from_parts(200, 0));
        assert_eq!(
            service.remaining_limit(&wallet, &cat("Food")).unwrap(),
            Money::from_parts(800, 0)
        );
        assert!(storage.wallets.find_by_owner("alice").unwrap().is_some());
    }

    #[test]
    fn test_set_budget_updates_existing_in_place() {
        let storage = Storage::in_memory();
        let service = BudgetService::new(&storage);
        let mut wallet = wallet();
        wallet.add_category_budget(CategoryBudget::new(cat("Food"), Money::zero()).unwrap());

        service
            .set_budget(&mut wallet, &cat("FOOD"), Money::from_parts(50, 0))
            .unwrap();

        assert_eq!(wallet.budget_count(), 1);
        let budget = wallet.budget_by_name("food").unwrap();
        assert_eq!(budget.category().name(), "Food");
        assert_eq!(budget.limit(), Money::from_parts(50, 0));
    }

    #[test]
    fn test_ensure_budget_exists_is_idempotent() {
        let storage = Storage::in_memory();
        let service = BudgetService::new(&storage);
        let mut wallet = wallet();

        let first = service.ensure_budget_exists(&mut wallet, &cat("Travel")).unwrap();
        let second = service.ensure_budget_exists(&mut wallet, &cat("travel")).unwrap();

        assert_eq!(wallet.budget_count(), 1);
        assert_eq!(second.category().name(), "Travel");
        assert_eq!(first, second);
        assert!(wallet.budget_by_name("travel").unwrap().limit().is_zero());
    }

    #[test]
    fn test_remaining_limit_without_budget() {
        let storage = Storage::in_memory();
        let service = BudgetService::new(&storage);
        let result = service.remaining_limit(&wallet(), &cat("Nope"));
        assert!(matches!(result, Err(FinanceError::NoBudgetSet(name)) if name == "Nope"));
    }

    #[test]
    fn test_exceeded_and_near_limit_are_exclusive() {
        let storage = Storage::in_memory();
        let service = BudgetService::new(&storage);
        let mut wallet = wallet();
        let food = cat("Food");
        wallet.add_category_budget(
            CategoryBudget::with_spent(
                food.clone(),
                Money::from_parts(100, 0),
                Money::from_parts(79, 0),
            )
            .unwrap(),
        );
        assert!(!service.is_budget_near_limit(&wallet, &food));
        assert!(!service.is_budget_exceeded(&wallet, &food));

        wallet
            .category_budget_mut(&food)
            .unwrap()
            .set_spent(Money::from_parts(80, 0))
            .unwrap();
        assert!(service.is_budget_near_limit(&wallet, &food));

        wallet
            .category_budget_mut(&food)
            .unwrap()
            .set_spent(Money::from_parts(100, 0))
            .unwrap();
        assert!(service.is_budget_near_limit(&wallet, &food));
        assert!(!service.is_budget_exceeded(&wallet, &food));

        wallet
            .category_budget_mut(&food)
            .unwrap()
            .set_spent(Money::from_parts(101, 0))
            .unwrap();
        assert!(service.is_budget_exceeded(&wallet, &food));
        assert!(!service.is_budget_near_limit(&wallet, &food));
    }

    #[test]
    fn test_zero_limit_never_near() {
        let storage = Storage::in_memory();
        let service = BudgetService::new(&storage);
        let mut wallet = wallet();
        let food = cat("Food");
        wallet.add_category_budget(
            CategoryBudget::with_spent(food.clone(), Money::zero(), Money::from_parts(5, 0))
                .unwrap(),
        );

        assert!(!service.is_budget_near_limit(&wallet, &food));
        assert!(service.is_budget_exceeded(&wallet, &food));
        assert!(!service.is_budget_exceeded(&wallet, &cat("Other")));
    }

    #[test]
    fn test_all_budgets_skips_income_only() {
        let storage = Storage::in_memory();
        let service = BudgetService::new(&storage);
        let mut wallet = wallet();
        record(&mut wallet, TransactionType::Income, 10, "Gift");
        wallet.add_category_budget(CategoryBudget::new(cat("Gift"), Money::zero()).unwrap());
        wallet.add_category_budget(CategoryBudget::new(cat("Rent"), Money::zero()).unwrap());

        let names: Vec<_> = service
            .all_budgets(&wallet)
            .iter()
            .map(|b| b.category().name().to_string())
            .collect();
        assert_eq!(names, vec!["Rent"]);
    }
}
