//! Wallet summary formatting
//!
//! Balance, income by category, expenses by category and budgets.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::budget::format_budget_table;
use crate::models::{Category, CategoryBudget, Money};

/// Everything `show_summary` prints, gathered by the caller
#[derive(Debug, Clone)]
pub struct Summary {
    pub balance: Money,
    pub total_income: Money,
    pub total_expense: Money,
    pub income_by_category: Vec<(Category, Money)>,
    pub expense_by_category: Vec<(Category, Money)>,
    pub budgets: Vec<CategoryBudget>,
}

#[derive(Tabled)]
struct TotalRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

fn totals_table(totals: &[(Category, Money)]) -> String {
    let rows: Vec<_> = totals
        .iter()
        .map(|(category, amount)| TotalRow {
            category: category.name().to_string(),
            amount: amount.to_string(),
        })
        .collect();
    Table::new(rows).with(Style::psql()).to_string()
}

/// Format a wallet summary
pub fn format_summary(summary: &Summary) -> String {
    let mut output = String::new();

    output.push_str(&format!("Balance: {}\n", summary.balance));
    output.push_str(&format!("Total income: {}\n", summary.total_income));
    if !summary.income_by_category.is_empty() {
        output.push_str("Income by category:\n");
        output.push_str(&totals_table(&summary.income_by_category));
        output.push('\n');
    }

    output.push_str(&format!("Total expenses: {}\n", summary.total_expense));
    if !summary.expense_by_category.is_empty() {
        output.push_str("Expenses by category:\n");
        output.push_str(&totals_table(&summary.expense_by_category));
        output.push('\n');
    }

    if !summary.budgets.is_empty() {
        output.push_str("Budgets:\n");
        output.push_str(&format_budget_table(&summary.budgets));
        output.push('\n');
    }

    output
}
