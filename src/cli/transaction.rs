//! add_income, add_expense and show_transactions

use std::io::{BufRead, Write};

use chrono::NaiveDate;

use super::{parse_amount, Console, Context};
use crate::display::{format_filtered_totals, format_transaction_table};
use crate::error::FinanceResult;
use crate::models::{Money, TransactionType, User, Wallet};
use crate::services::{CategoryService, TransactionFilter, WalletService};

/// Fields shared by income and expense entry
struct Entry {
    amount: Money,
    category: String,
    description: String,
}

fn read_entry<R: BufRead, W: Write>(console: &mut Console<R, W>) -> FinanceResult<Entry> {
    let amount = parse_amount(&console.ask("Amount: ")?)?;
    let category = console.ask("Category name: ")?;
    let description = console.ask("Description (optional): ")?;
    Ok(Entry {
        amount,
        category,
        description,
    })
}

pub fn add_income<R: BufRead, W: Write>(
    ctx: &Context<'_>,
    console: &mut Console<R, W>,
    user: &mut User,
) -> FinanceResult<()> {
    console.println("--- Add income ---")?;
    let entry = read_entry(console)?;

    let wallet = user.wallet_mut();
    let category = CategoryService::new(ctx.storage).resolve(wallet, &entry.category)?;
    let service = WalletService::new(ctx.storage);
    service.add_income(wallet, entry.amount, &category, Some(entry.description))?;

    console.println("Income added successfully.")?;
    for alert in service.balance_alerts(wallet) {
        console.println(format!("WARNING: {}", alert))?;
    }
    Ok(())
}

pub fn add_expense<R: BufRead, W: Write>(
    ctx: &Context<'_>,
    console: &mut Console<R, W>,
    user: &mut User,
) -> FinanceResult<()> {
    console.println("--- Add expense ---")?;
    let entry = read_entry(console)?;

    let wallet = user.wallet_mut();
    let category = CategoryService::new(ctx.storage).resolve(wallet, &entry.category)?;
    let service = WalletService::new(ctx.storage);
    service.add_expense(wallet, entry.amount, &category, Some(entry.description))?;

    console.println("Expense added successfully.")?;
    for alert in service.expense_alerts(wallet, &category) {
        console.println(format!("WARNING: {}", alert))?;
    }
    Ok(())
}

pub fn show_transactions<R: BufRead, W: Write>(
    ctx: &Context<'_>,
    console: &mut Console<R, W>,
    user: &mut User,
) -> FinanceResult<()> {
    console.println("--- Show transactions ---")?;
    let wallet = user.wallet();
    let filter = read_filter(ctx, console, wallet, "Showing all transactions.")?;

    let transactions = WalletService::new(ctx.storage).transactions(wallet, &filter);
    if transactions.is_empty() {
        return console.println("No transactions found matching the criteria.");
    }

    console.println(format_transaction_table(
        &transactions,
        &ctx.settings.date_format,
    ))?;
    console.print(format_filtered_totals(&transactions, filter.kind))
}

/// Prompt for type, categories and date range
///
/// Unknown categories and unparseable dates are reported and left out of
/// the filter rather than failing the command.
pub(crate) fn read_filter<R: BufRead, W: Write>(
    ctx: &Context<'_>,
    console: &mut Console<R, W>,
    wallet: &Wallet,
    fallback: &str,
) -> FinanceResult<TransactionFilter> {
    let mut filter = TransactionFilter::new();

    let kind = console.ask("Type (income/expense/all, default: all): ")?;
    filter.kind = kind.trim().parse::<TransactionType>().ok();

    let names = console.ask("Categories (comma-separated, empty for all): ")?;
    if !names.trim().is_empty() {
        let categories = CategoryService::new(ctx.storage);
        for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            match categories.find_by_name(wallet, name) {
                Some(category) => filter.categories.push(category),
                None => console.println(format!(
                    "Warning: Category '{}' not found, skipping.",
                    name
                ))?,
            }
        }
        if filter.categories.is_empty() {
            console.println(format!("No valid categories found. {}", fallback))?;
        }
    }

    let from = console.ask("From date (YYYY-MM-DD, empty for no limit): ")?;
    filter.from = parse_date_or_warn(console, &from, "from")?;

    let to = console.ask("To date (YYYY-MM-DD, empty for no limit): ")?;
    filter.to = parse_date_or_warn(console, &to, "to")?;

    Ok(filter)
}

fn parse_date_or_warn<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    input: &str,
    which: &str,
) -> FinanceResult<Option<NaiveDate>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    match NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        Ok(date) => Ok(Some(date)),
        Err(_) => {
            console.println(format!(
                "Invalid date format. Ignoring {} date filter.",
                which
            ))?;
            Ok(None)
        }
    }
}
