//! Budget display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::CategoryBudget;

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
}

/// Format budgets with limit, spent and remaining columns
pub fn format_budget_table(budgets: &[CategoryBudget]) -> String {
    if budgets.is_empty() {
        return "No budgets set.".to_string();
    }

    let rows: Vec<_> = budgets
        .iter()
        .map(|b| BudgetRow {
            category: b.category().name().to_string(),
            limit: b.limit().to_string(),
            spent: b.spent().to_string(),
            remaining: b.remaining().to_string(),
        })
        .collect();

    Table::new(rows).with(Style::psql()).to_string()
}
