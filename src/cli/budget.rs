//! set_budget and show_budgets

use std::io::{BufRead, Write};

use super::{parse_amount, Console, Context};
use crate::display::format_budget_table;
use crate::error::FinanceResult;
use crate::models::User;
use crate::services::{BudgetService, CategoryService};

pub fn set_budget<R: BufRead, W: Write>(
    ctx: &Context<'_>,
    console: &mut Console<R, W>,
    user: &mut User,
) -> FinanceResult<()> {
    console.println("--- Set budget for category ---")?;
    let name = console.ask("Category name: ")?;
    let limit = parse_amount(&console.ask("Budget limit (amount): ")?)?;

    let wallet = user.wallet_mut();
    let category = CategoryService::new(ctx.storage).resolve(wallet, &name)?;
    let budget = BudgetService::new(ctx.storage).set_budget(wallet, &category, limit)?;

    console.println(format!(
        "Budget set for category '{}': {}",
        budget.category().name(),
        budget.limit()
    ))
}

pub fn show_budgets<R: BufRead, W: Write>(
    ctx: &Context<'_>,
    console: &mut Console<R, W>,
    user: &mut User,
) -> FinanceResult<()> {
    console.println("--- Budgets by category ---")?;
    let budgets = BudgetService::new(ctx.storage).all_budgets(user.wallet());
    console.println(format_budget_table(&budgets))
}
