//! Wallet service
//!
//! Recording income and expenses, filtered queries and aggregate totals.
//! Every recording call persists the wallet once it has been updated.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::audit::EntityType;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Category, Money, Transaction, TransactionId, TransactionType, Wallet};
use crate::services::BudgetService;
use crate::storage::Storage;

/// Criteria for selecting transactions; empty fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    /// Matches any of these categories; empty means no category filter
    pub categories: Vec<Category>,
    /// Inclusive, compared on the calendar date
    pub from: Option<NaiveDate>,
    /// Inclusive, compared on the calendar date
    pub to: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn from_date(mut self, from: NaiveDate) -> Self {
        self.from = Some(from);
        self
    }

    pub fn to_date(mut self, to: NaiveDate) -> Self {
        self.to = Some(to);
        self
    }

    /// Whether `txn` satisfies every criterion
    pub fn matches(&self, txn: &Transaction) -> bool {
        if self.kind.is_some_and(|kind| kind != txn.kind()) {
            return false;
        }
        if !self.categories.is_empty() && !self.categories.contains(txn.category()) {
            return false;
        }
        let date = txn.date();
        if self.from.is_some_and(|from| date < from) {
            return false;
        }
        if self.to.is_some_and(|to| date > to) {
            return false;
        }
        true
    }
}

/// Warning raised after recording a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    BudgetExceeded { category: String, remaining: Money },
    BudgetNearLimit { category: String, remaining: Money },
    ZeroBalance,
    ExpensesExceedIncome { income: Money, expense: Money },
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::BudgetExceeded {
                category,
                remaining,
            } => write!(
                f,
                "Budget limit exceeded for category '{}' (remaining: {}).",
                category, remaining
            ),
            Alert::BudgetNearLimit {
                category,
                remaining,
            } => write!(
                f,
                "Budget for category '{}' is at 80% or more of the limit (remaining: {}).",
                category, remaining
            ),
            Alert::ZeroBalance => write!(f, "Wallet balance is zero."),
            Alert::ExpensesExceedIncome { income, expense } => write!(
                f,
                "Total expenses ({}) are greater than total income ({}).",
                expense, income
            ),
        }
    }
}

/// Service for recording transactions and querying the wallet
pub struct WalletService<'a> {
    storage: &'a Storage,
}

impl<'a> WalletService<'a> {
    /// Create a new wallet service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record income now
    pub fn add_income(
        &self,
        wallet: &mut Wallet,
        amount: Money,
        category: &Category,
        description: Option<String>,
    ) -> FinanceResult<TransactionId> {
        self.add_income_at(wallet, amount, category, description, now())
    }

    /// Record income at a given time
    pub fn add_income_at(
        &self,
        wallet: &mut Wallet,
        amount: Money,
        category: &Category,
        description: Option<String>,
        timestamp: NaiveDateTime,
    ) -> FinanceResult<TransactionId> {
        let id = self.append_income(wallet, amount, category, description, timestamp)?;
        self.storage.save_wallet(wallet)?;
        self.audit_transaction(wallet, id);
        Ok(id)
    }

    /// Record an expense now
    pub fn add_expense(
        &self,
        wallet: &mut Wallet,
        amount: Money,
        category: &Category,
        description: Option<String>,
    ) -> FinanceResult<TransactionId> {
        self.add_expense_at(wallet, amount, category, description, now())
    }

    /// Record an expense at a given time
    ///
    /// The category's budget is provisioned first; the transaction then
    /// uses the budget's canonical category and its `spent` is increased.
    pub fn add_expense_at(
        &self,
        wallet: &mut Wallet,
        amount: Money,
        category: &Category,
        description: Option<String>,
        timestamp: NaiveDateTime,
    ) -> FinanceResult<TransactionId> {
        let id = self.append_expense(wallet, amount, category, description, timestamp)?;
        self.storage.save_wallet(wallet)?;
        self.audit_transaction(wallet, id);
        Ok(id)
    }

    /// Append income without persisting
    pub(crate) fn append_income(
        &self,
        wallet: &mut Wallet,
        amount: Money,
        category: &Category,
        description: Option<String>,
        timestamp: NaiveDateTime,
    ) -> FinanceResult<TransactionId> {
        ensure_positive(amount)?;
        let txn = Transaction::new(
            TransactionType::Income,
            amount,
            category.clone(),
            description,
            timestamp,
        )?;
        Ok(wallet.add_transaction(txn))
    }

    /// Append an expense and bump its budget without persisting the wallet
    pub(crate) fn append_expense(
        &self,
        wallet: &mut Wallet,
        amount: Money,
        category: &Category,
        description: Option<String>,
        timestamp: NaiveDateTime,
    ) -> FinanceResult<TransactionId> {
        ensure_positive(amount)?;
        let tracked = BudgetService::new(self.storage).ensure_budget_exists(wallet, category)?;

        let txn = Transaction::new(
            TransactionType::Expense,
            amount,
            tracked.category().clone(),
            description,
            timestamp,
        )?;
        let id = wallet.add_transaction(txn);

        let budget = wallet
            .category_budget_mut(tracked.category())
            .ok_or_else(|| FinanceError::NoBudgetSet(tracked.category().name().to_string()))?;
        budget.add_spent(amount)?;

        Ok(id)
    }

    /// Warnings to show after recording an expense in `category`
    pub fn expense_alerts(&self, wallet: &Wallet, category: &Category) -> Vec<Alert> {
        let budgets = BudgetService::new(self.storage);
        let mut alerts = Vec::new();

        // A zero limit counts as exceeded by any spending
        if let Ok(remaining) = budgets.remaining_limit(wallet, category) {
            if budgets.is_budget_exceeded(wallet, category) {
                alerts.push(Alert::BudgetExceeded {
                    category: category.name().to_string(),
                    remaining,
                });
            } else if budgets.is_budget_near_limit(wallet, category) {
                alerts.push(Alert::BudgetNearLimit {
                    category: category.name().to_string(),
                    remaining,
                });
            }
        }

        alerts.extend(self.balance_alerts(wallet));

        let income = self.total_income(wallet);
        let expense = self.total_expense(wallet);
        if expense > income {
            alerts.push(Alert::ExpensesExceedIncome { income, expense });
        }

        alerts
    }

    /// Warnings to show after recording income
    pub fn balance_alerts(&self, wallet: &Wallet) -> Vec<Alert> {
        if wallet.balance().is_zero() {
            vec![Alert::ZeroBalance]
        } else {
            Vec::new()
        }
    }

    /// Sum of `kind` transactions, restricted to `categories` when non-empty
    pub fn total_by_type_and_categories(
        &self,
        wallet: &Wallet,
        kind: TransactionType,
        categories: &[Category],
    ) -> Money {
        wallet
            .transactions()
            .iter()
            .filter(|txn| txn.kind() == kind)
            .filter(|txn| categories.is_empty() || categories.contains(txn.category()))
            .map(Transaction::amount)
            .sum()
    }

    pub fn total_income(&self, wallet: &Wallet) -> Money {
        self.total_by_type_and_categories(wallet, TransactionType::Income, &[])
    }

    pub fn total_expense(&self, wallet: &Wallet) -> Money {
        self.total_by_type_and_categories(wallet, TransactionType::Expense, &[])
    }

    pub fn total_income_by_category(&self, wallet: &Wallet, category: &Category) -> Money {
        self.total_by_type_and_categories(
            wallet,
            TransactionType::Income,
            std::slice::from_ref(category),
        )
    }

    pub fn total_expense_by_category(&self, wallet: &Wallet, category: &Category) -> Money {
        self.total_by_type_and_categories(
            wallet,
            TransactionType::Expense,
            std::slice::from_ref(category),
        )
    }

    pub fn total_by_categories(
        &self,
        wallet: &Wallet,
        categories: &[Category],
        kind: TransactionType,
    ) -> Money {
        self.total_by_type_and_categories(wallet, kind, categories)
    }

    /// Per-category sums of `kind` transactions, sorted by category name
    ///
    /// Each category is listed under the casing it was first seen with.
    pub fn totals_by_category(&self, wallet: &Wallet, kind: TransactionType) -> Vec<(Category, Money)> {
        let mut totals: BTreeMap<String, (Category, Money)> = BTreeMap::new();
        for txn in wallet.transactions().iter().filter(|t| t.kind() == kind) {
            totals
                .entry(txn.category().normalized())
                .or_insert_with(|| (txn.category().clone(), Money::zero()))
                .1 += txn.amount();
        }
        totals.into_values().collect()
    }

    /// Transactions matching `filter`, in log order
    pub fn transactions<'w>(
        &self,
        wallet: &'w Wallet,
        filter: &TransactionFilter,
    ) -> Vec<&'w Transaction> {
        wallet
            .transactions()
            .iter()
            .filter(|txn| filter.matches(txn))
            .collect()
    }

    fn audit_transaction(&self, wallet: &Wallet, id: TransactionId) {
        if let Some(txn) = wallet.transaction(id) {
            tracing::debug!(owner = wallet.owner_login(), %id, %txn, "recorded transaction");
            self.storage.log_create(
                EntityType::Transaction,
                format!("{}/tx{}", wallet.owner_login(), id),
                Some(txn.category().name().to_string()),
                txn,
            );
        }
    }
}

fn ensure_positive(amount: Money) -> FinanceResult<()> {
    if !amount.is_positive() {
        return Err(FinanceError::InvalidAmount(format!(
            "Amount must be greater than 0, got {}",
            amount
        )));
    }
    Ok(())
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
