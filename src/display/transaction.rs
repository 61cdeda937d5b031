//! Transaction display formatting
//!
//! Register-style table for `show_transactions`, followed by the filtered
//! totals.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Money, Transaction, TransactionType};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl TransactionRow {
    fn new(txn: &Transaction, date_format: &str) -> Self {
        Self {
            date: txn.date().format(date_format).to_string(),
            kind: txn.kind().to_string(),
            category: txn.category().name().to_string(),
            amount: txn.amount().to_string(),
            description: txn.description().unwrap_or("").to_string(),
        }
    }
}

/// Format transactions as a table, in the given order
pub fn format_transaction_table(transactions: &[&Transaction], date_format: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found matching the criteria.".to_string();
    }

    let rows: Vec<_> = transactions
        .iter()
        .map(|txn| TransactionRow::new(txn, date_format))
        .collect();

    Table::new(rows).with(Style::psql()).to_string()
}

/// Count and totals line block shown under a filtered listing
///
/// Only the totals relevant to `kind` are shown; `None` shows both.
pub fn format_filtered_totals(transactions: &[&Transaction], kind: Option<TransactionType>) -> String {
    let income: Money = transactions
        .iter()
        .filter(|t| t.is_income())
        .map(|t| t.amount())
        .sum();
    let expense: Money = transactions
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.amount())
        .sum();

    let mut output = format!("Total: {} transaction(s)\n", transactions.len());
    if kind != Some(TransactionType::Expense) {
        output.push_str(&format!("Total income (filtered): {}\n", income));
    }
    if kind != Some(TransactionType::Income) {
        output.push_str(&format!("Total expense (filtered): {}\n", expense));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::NaiveDate;

    fn txn(kind: TransactionType, amount: i64, category: &str) -> Transaction {
        Transaction::new(
            kind,
            Money::from_parts(amount, 0),
            Category::new(category).unwrap(),
            Some("note".to_string()),
            NaiveDate::from_ymd_opt(2025, 3, 4)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_table() {
        let output = format_transaction_table(&[], "%Y-%m-%d");
        assert!(output.contains("No transactions found"));
    }

    #[test]
    fn test_table_contents() {
        let a = txn(TransactionType::Income, 5000, "Salary");
        let b = txn(TransactionType::Expense, 200, "Food");

        let output = format_transaction_table(&[&a, &b], "%d.%m.%Y");
        assert!(output.contains("Category"));
        assert!(output.contains("04.03.2025"));
        assert!(output.contains("INCOME"));
        assert!(output.contains("Salary"));
        assert!(output.contains("EXPENSE"));
        assert!(output.contains("note"));
    }

    #[test]
    fn test_filtered_totals() {
        let a = txn(TransactionType::Income, 5000, "Salary");
        let b = txn(TransactionType::Expense, 200, "Food");
        let c = txn(TransactionType::Expense, 50, "Food");
        let all = [&a, &b, &c];

        let both = format_filtered_totals(&all, None);
        assert!(both.contains("Total: 3 transaction(s)"));
        assert!(both.contains("Total income (filtered): 5000"));
        assert!(both.contains("Total expense (filtered): 250"));

        let expenses_only = format_filtered_totals(&all[1..], Some(TransactionType::Expense));
        assert!(!expenses_only.contains("income"));
        assert!(expenses_only.contains("Total expense (filtered): 250"));
    }
}
