//! show_summary

use std::io::{BufRead, Write};

use super::{Console, Context};
use crate::display::{format_summary, Summary};
use crate::error::FinanceResult;
use crate::models::{TransactionType, User};
use crate::services::{BudgetService, WalletService};

pub fn show_summary<R: BufRead, W: Write>(
    ctx: &Context<'_>,
    console: &mut Console<R, W>,
    user: &mut User,
) -> FinanceResult<()> {
    let wallet = user.wallet();
    let service = WalletService::new(ctx.storage);

    let summary = Summary {
        balance: wallet.balance(),
        total_income: service.total_income(wallet),
        total_expense: service.total_expense(wallet),
        income_by_category: service.totals_by_category(wallet, TransactionType::Income),
        expense_by_category: service.totals_by_category(wallet, TransactionType::Expense),
        budgets: BudgetService::new(ctx.storage).all_budgets(wallet),
    };

    console.println("--- Summary ---")?;
    console.print(format_summary(&summary))
}
