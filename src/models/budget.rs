//! Category budget model
//!
//! A budget binds a spending limit and a running `spent` total to one
//! category. `spent` is maintained incrementally by expense recording and
//! can be recomputed from the transaction log at any time.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::Category;
use super::money::Money;
use crate::error::{FinanceError, FinanceResult};

/// Spending limit and accumulated spend for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBudget {
    category: Category,
    limit: Money,
    #[serde(default)]
    spent: Money,
}

impl CategoryBudget {
    /// Create a budget with nothing spent yet
    pub fn new(category: Category, limit: Money) -> FinanceResult<Self> {
        Self::with_spent(category, limit, Money::zero())
    }

    /// Create a budget carrying an existing spent total (used by rename)
    pub fn with_spent(category: Category, limit: Money, spent: Money) -> FinanceResult<Self> {
        validate_non_negative("limit", limit)?;
        validate_non_negative("spent", spent)?;
        Ok(Self {
            category,
            limit,
            spent,
        })
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn limit(&self) -> Money {
        self.limit
    }

    pub fn spent(&self) -> Money {
        self.spent
    }

    /// Update the limit in place
    pub fn set_limit(&mut self, limit: Money) -> FinanceResult<()> {
        validate_non_negative("limit", limit)?;
        self.limit = limit;
        Ok(())
    }

    /// Add an expense amount to the running total
    pub fn add_spent(&mut self, amount: Money) -> FinanceResult<()> {
        validate_non_negative("spent amount", amount)?;
        self.spent += amount;
        Ok(())
    }

    /// Overwrite the running total (full recomputation)
    pub fn set_spent(&mut self, spent: Money) -> FinanceResult<()> {
        validate_non_negative("spent", spent)?;
        self.spent = spent;
        Ok(())
    }

    /// `limit - spent`; negative once the budget is exceeded
    pub fn remaining(&self) -> Money {
        self.limit - self.spent
    }
}

fn validate_non_negative(field: &str, amount: Money) -> FinanceResult<()> {
    if amount.is_negative() {
        return Err(FinanceError::InvalidInput(format!(
            "Budget {} cannot be negative: {}",
            field, amount
        )));
    }
    Ok(())
}

impl fmt::Display for CategoryBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: limit {}, spent {}, remaining {}",
            self.category,
            self.limit,
            self.spent,
            self.remaining()
        )
    }
}
