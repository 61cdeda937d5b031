//! CSV export of transactions
//!
//! Output format:
//!
//! ```text
//! Date,Type,Category,Amount,Description
//! 2025-01-10,INCOME,Salary,5000,"January"
//! ```
//!
//! The description is always quoted, with `"` doubled and `,` replaced by
//! `;`. Commas in descriptions are therefore not preserved.

use std::io::Write;

use crate::error::{FinanceError, FinanceResult};
use crate::models::Transaction;

/// Header line of exported files
pub const CSV_HEADER: &str = "Date,Type,Category,Amount,Description";

/// Header fields, in order
pub const CSV_HEADER_FIELDS: [&str; 5] = ["Date", "Type", "Category", "Amount", "Description"];

/// Write `transactions` in order, returning the number of rows written
pub fn export_transactions_csv<'t, W, I>(writer: &mut W, transactions: I) -> FinanceResult<usize>
where
    W: Write,
    I: IntoIterator<Item = &'t Transaction>,
{
    writeln!(writer, "{}", CSV_HEADER).map_err(|e| FinanceError::Export(e.to_string()))?;

    let mut rows = 0;
    for txn in transactions {
        writeln!(
            writer,
            "{},{},{},{},\"{}\"",
            txn.date().format("%Y-%m-%d"),
            txn.kind(),
            txn.category().name(),
            txn.amount(),
            escape_description(txn.description().unwrap_or(""))
        )
        .map_err(|e| FinanceError::Export(e.to_string()))?;
        rows += 1;
    }

    writer
        .flush()
        .map_err(|e| FinanceError::Export(e.to_string()))?;

    Ok(rows)
}

/// Double quotes and replace commas, for use inside a quoted field
fn escape_description(s: &str) -> String {
    s.replace('"', "\"\"").replace(',', ";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Money, TransactionType};
    use chrono::NaiveDate;

    fn txn(kind: TransactionType, amount: Money, category: &str, desc: Option<&str>) -> Transaction {
        Transaction::new(
            kind,
            amount,
            Category::new(category).unwrap(),
            desc.map(str::to_string),
            NaiveDate::from_ymd_opt(2025, 1, 10)
                .unwrap()
                .and_hms_opt(14, 5, 0)
                .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_escape_description() {
        assert_eq!(escape_description("plain"), "plain");
        assert_eq!(escape_description("a, b"), "a; b");
        assert_eq!(escape_description("say \"hi\""), "say \"\"hi\"\"");
    }

    #[test]
    fn test_export_rows() {
        let rows = vec![
            txn(
                TransactionType::Income,
                Money::from_parts(5000, 0),
                "Salary",
                Some("January"),
            ),
            txn(
                TransactionType::Expense,
                Money::from_parts(1050, 2),
                "Coffee Shops",
                Some("latte, croissant"),
            ),
            txn(TransactionType::Expense, Money::from_parts(3, 0), "Fees", None),
        ];

        let mut out = Vec::new();
        let written = export_transactions_csv(&mut out, &rows).unwrap();
        assert_eq!(written, 3);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Date,Type,Category,Amount,Description\n\
             2025-01-10,INCOME,Salary,5000,\"January\"\n\
             2025-01-10,EXPENSE,Coffee Shops,10.50,\"latte; croissant\"\n\
             2025-01-10,EXPENSE,Fees,3,\"\"\n"
        );
    }

    #[test]
    fn test_header_fields_match_header() {
        assert_eq!(CSV_HEADER_FIELDS.join(","), CSV_HEADER);
    }
}
