//! Wallet aggregate
//!
//! A wallet owns the balance, the transaction log and the per-category
//! budgets of one user. The wallet itself only guarantees that the balance
//! matches the log; keeping budget `spent` totals in step is the job of the
//! budget and wallet services.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::budget::CategoryBudget;
use super::category::{normalize, Category};
use super::money::Money;
use super::transaction::{Transaction, TransactionId};
use crate::error::{FinanceError, FinanceResult};

/// Balance, transaction log and category budgets of a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WalletRecord", into = "WalletRecord")]
pub struct Wallet {
    owner_login: String,
    initial_balance: Money,
    balance: Money,
    transactions: Vec<Transaction>,
    /// Keyed by normalized (lowercase) category name
    budgets: BTreeMap<String, CategoryBudget>,
}

impl Wallet {
    /// Create an empty wallet
    pub fn new(owner_login: &str, initial_balance: Money) -> FinanceResult<Self> {
        let owner_login = owner_login.trim();
        if owner_login.is_empty() {
            return Err(FinanceError::InvalidInput(
                "Wallet owner login cannot be empty".into(),
            ));
        }
        if initial_balance.is_negative() {
            return Err(FinanceError::InvalidInput(format!(
                "Initial balance cannot be negative: {}",
                initial_balance
            )));
        }

        Ok(Self {
            owner_login: owner_login.to_string(),
            initial_balance,
            balance: initial_balance,
            transactions: Vec::new(),
            budgets: BTreeMap::new(),
        })
    }

    pub fn owner_login(&self) -> &str {
        &self.owner_login
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn initial_balance(&self) -> Money {
        self.initial_balance
    }

    /// The transaction log in recording order
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The transaction log paired with stable handles
    pub fn iter_transactions(&self) -> impl Iterator<Item = (TransactionId, &Transaction)> {
        self.transactions
            .iter()
            .enumerate()
            .map(|(index, txn)| (TransactionId(index), txn))
    }

    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.get(id.0)
    }

    /// Append a transaction and apply its balance effect
    ///
    /// Budgets are not touched.
    pub fn add_transaction(&mut self, txn: Transaction) -> TransactionId {
        self.balance += txn.signed_amount();
        self.transactions.push(txn);
        TransactionId(self.transactions.len() - 1)
    }

    /// Swap the record at `id` for `txn`, returning the old record
    ///
    /// The old balance effect is reversed and the new one applied. Budgets
    /// are not touched.
    pub fn replace_transaction(
        &mut self,
        id: TransactionId,
        txn: Transaction,
    ) -> FinanceResult<Transaction> {
        let len = self.transactions.len();
        let slot = self
            .transactions
            .get_mut(id.0)
            .ok_or(FinanceError::IndexOutOfRange { index: id.0, len })?;

        self.balance -= slot.signed_amount();
        self.balance += txn.signed_amount();
        Ok(std::mem::replace(slot, txn))
    }

    /// Insert a budget, replacing any budget for the same normalized name
    pub fn add_category_budget(&mut self, budget: CategoryBudget) -> Option<CategoryBudget> {
        self.budgets.insert(budget.category().normalized(), budget)
    }

    pub fn category_budget(&self, category: &Category) -> Option<&CategoryBudget> {
        self.budgets.get(&category.normalized())
    }

    pub fn category_budget_mut(&mut self, category: &Category) -> Option<&mut CategoryBudget> {
        self.budgets.get_mut(&category.normalized())
    }

    /// Budget lookup by raw name
    pub fn budget_by_name(&self, name: &str) -> Option<&CategoryBudget> {
        self.budgets.get(&normalize(name))
    }

    pub fn has_category_budget(&self, category: &Category) -> bool {
        self.budgets.contains_key(&category.normalized())
    }

    /// Move the budget of `old` to the category carried by `replacement`
    pub fn replace_category_in_budget(
        &mut self,
        old: &Category,
        replacement: CategoryBudget,
    ) -> FinanceResult<CategoryBudget> {
        let previous = self
            .budgets
            .remove(&old.normalized())
            .ok_or_else(|| FinanceError::NoBudgetSet(old.name().to_string()))?;
        self.budgets
            .insert(replacement.category().normalized(), replacement);
        Ok(previous)
    }

    /// All budgets ordered by normalized category name
    pub fn budgets(&self) -> impl Iterator<Item = &CategoryBudget> {
        self.budgets.values()
    }

    pub fn budget_count(&self) -> usize {
        self.budgets.len()
    }

    /// Sum of every expense recorded under `category` (case-insensitive)
    pub fn expense_total_for(&self, category: &Category) -> Money {
        self.transactions
            .iter()
            .filter(|txn| txn.is_expense() && txn.category() == category)
            .map(|txn| txn.amount())
            .sum()
    }

    /// Balance implied by the initial balance and the current log
    pub fn computed_balance(&self) -> Money {
        self.initial_balance
            + self
                .transactions
                .iter()
                .map(|txn| txn.signed_amount())
                .sum::<Money>()
    }
}

/// On-disk shape of a wallet
#[derive(Clone, Serialize, Deserialize)]
struct WalletRecord {
    owner_login: String,
    #[serde(default)]
    initial_balance: Money,
    balance: Money,
    #[serde(default)]
    transactions: Vec<Transaction>,
    #[serde(default)]
    budgets: Vec<CategoryBudget>,
}

impl From<Wallet> for WalletRecord {
    fn from(wallet: Wallet) -> Self {
        Self {
            owner_login: wallet.owner_login,
            initial_balance: wallet.initial_balance,
            balance: wallet.balance,
            transactions: wallet.transactions,
            budgets: wallet.budgets.into_values().collect(),
        }
    }
}

impl TryFrom<WalletRecord> for Wallet {
    type Error = FinanceError;

    fn try_from(record: WalletRecord) -> Result<Self, Self::Error> {
        if let Some(bad) = record.transactions.iter().find(|t| !t.amount().is_positive()) {
            return Err(FinanceError::InvalidAmount(format!(
                "Stored transaction has non-positive amount: {}",
                bad
            )));
        }

        let mut wallet = Wallet::new(&record.owner_login, record.initial_balance)?;
        for txn in record.transactions {
            wallet.add_transaction(txn);
        }

        if wallet.balance != record.balance {
            tracing::warn!(
                owner = %wallet.owner_login,
                stored = %record.balance,
                computed = %wallet.balance,
                "stored balance disagrees with transaction log, using computed balance"
            );
        }

        for budget in record.budgets {
            let key = budget.category().normalized();
            if wallet.budgets.contains_key(&key) {
                return Err(FinanceError::duplicate_category(budget.category().name()));
            }
            wallet.budgets.insert(key, budget);
        }

        Ok(wallet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;
    use chrono::NaiveDate;

    fn at(day: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn txn(kind: TransactionType, amount: i64, category: &str) -> Transaction {
        Transaction::new(
            kind,
            Money::from_parts(amount, 0),
            Category::new(category).unwrap(),
            None,
            at(1),
        )
        .unwrap()
    }

    fn wallet() -> Wallet {
        Wallet::new("alice", Money::from_parts(1000, 0)).unwrap()
    }

    #[test]
    fn test_new_wallet_validation() {
        assert!(Wallet::new("  ", Money::zero()).is_err());
        assert!(Wallet::new("bob", Money::from_parts(-1, 0)).is_err());

        let wallet = Wallet::new(" bob ", Money::zero()).unwrap();
        assert_eq!(wallet.owner_login(), "bob");
        assert!(wallet.balance().is_zero());
    }

    #[test]
    fn test_add_transaction_adjusts_balance() {
        let mut wallet = wallet();
        let id = wallet.add_transaction(txn(TransactionType::Income, 500, "Salary"));
        wallet.add_transaction(txn(TransactionType::Expense, 200, "Food"));

        assert_eq!(id.index(), 0);
        assert_eq!(wallet.balance(), Money::from_parts(1300, 0));
        assert_eq!(wallet.balance(), wallet.computed_balance());
        // budgets are left alone
        assert_eq!(wallet.budget_count(), 0);
    }

    #[test]
    fn test_replace_transaction_swaps_balance_effect() {
        let mut wallet = wallet();
        let id = wallet.add_transaction(txn(TransactionType::Expense, 100, "Food"));

        let old = wallet
            .replace_transaction(id, txn(TransactionType::Income, 40, "Gift"))
            .unwrap();

        assert_eq!(old.category().name(), "Food");
        assert_eq!(wallet.balance(), Money::from_parts(1040, 0));
        assert_eq!(wallet.transaction(id).unwrap().category().name(), "Gift");
    }

    #[test]
    fn test_replace_out_of_range() {
        let mut wallet = wallet();
        let result =
            wallet.replace_transaction(TransactionId(3), txn(TransactionType::Income, 1, "X"));
        assert!(matches!(
            result,
            Err(FinanceError::IndexOutOfRange { index: 3, len: 0 })
        ));
    }

    #[test]
    fn test_budget_keys_are_case_insensitive() {
        let mut wallet = wallet();
        let food = Category::new("Food").unwrap();
        wallet.add_category_budget(CategoryBudget::new(food, Money::zero()).unwrap());

        let lower = Category::new("FOOD").unwrap();
        assert!(wallet.has_category_budget(&lower));
        assert_eq!(
            wallet.category_budget(&lower).unwrap().category().name(),
            "Food"
        );
        assert!(wallet.budget_by_name(" food ").is_some());
    }

    #[test]
    fn test_replace_category_in_budget() {
        let mut wallet = wallet();
        let food = Category::new("Food").unwrap();
        wallet.add_category_budget(
            CategoryBudget::with_spent(
                food.clone(),
                Money::from_parts(300, 0),
                Money::from_parts(50, 0),
            )
            .unwrap(),
        );

        let meals = Category::new("Meals").unwrap();
        let replacement = CategoryBudget::with_spent(
            meals.clone(),
            Money::from_parts(300, 0),
            Money::from_parts(50, 0),
        )
        .unwrap();
        wallet.replace_category_in_budget(&food, replacement).unwrap();

        assert!(!wallet.has_category_budget(&food));
        assert_eq!(
            wallet.category_budget(&meals).unwrap().spent(),
            Money::from_parts(50, 0)
        );
    }

    #[test]
    fn test_budgets_sorted_by_name() {
        let mut wallet = wallet();
        for name in ["rent", "Food", "Bills"] {
            wallet.add_category_budget(
                CategoryBudget::new(Category::new(name).unwrap(), Money::zero()).unwrap(),
            );
        }
        let names: Vec<_> = wallet.budgets().map(|b| b.category().name()).collect();
        assert_eq!(names, vec!["Bills", "Food", "rent"]);
    }

    #[test]
    fn test_expense_total_for() {
        let mut wallet = wallet();
        wallet.add_transaction(txn(TransactionType::Expense, 10, "Food"));
        wallet.add_transaction(txn(TransactionType::Expense, 15, "food"));
        wallet.add_transaction(txn(TransactionType::Income, 99, "Food"));
        wallet.add_transaction(txn(TransactionType::Expense, 7, "Fuel"));

        let total = wallet.expense_total_for(&Category::new("FOOD").unwrap());
        assert_eq!(total, Money::from_parts(25, 0));
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut wallet = wallet();
        wallet.add_transaction(txn(TransactionType::Income, 5000, "Salary"));
        wallet.add_transaction(txn(TransactionType::Expense, 200, "Coffee Shops"));
        wallet.add_category_budget(
            CategoryBudget::with_spent(
                Category::new("Coffee Shops").unwrap(),
                Money::from_parts(250, 0),
                Money::from_parts(200, 0),
            )
            .unwrap(),
        );

        let json = serde_json::to_string(&wallet).unwrap();
        let back: Wallet = serde_json::from_str(&json).unwrap();

        assert_eq!(back, wallet);
        assert_eq!(back.balance(), Money::from_parts(5800, 0));
        let budget = back.budget_by_name("coffee shops").unwrap();
        assert_eq!(budget.category().name(), "Coffee Shops");
    }

    #[test]
    fn test_deserialize_rejects_duplicate_budget_keys() {
        let json = r#"{
            "owner_login": "alice",
            "initial_balance": "0",
            "balance": "0",
            "transactions": [],
            "budgets": [
                {"category": "Food", "limit": "0", "spent": "0"},
                {"category": "FOOD", "limit": "10", "spent": "0"}
            ]
        }"#;
        assert!(serde_json::from_str::<Wallet>(json).is_err());
    }
}
