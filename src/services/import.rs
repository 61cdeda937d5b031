//! CSV import service
//!
//! Reads files in the export format (`Date,Type,Category,Amount,Description`)
//! one line per row. Bad rows are reported and skipped; the rest are recorded
//! through the same paths as interactive entry. The wallet is saved once at
//! the end, and only if at least one row was imported.

use std::fmt;
use std::io::BufRead;

use chrono::{NaiveDate, NaiveTime};

use crate::audit::{AuditEntry, EntityType};
use crate::error::{FinanceError, FinanceResult};
use crate::export::csv::{CSV_HEADER, CSV_HEADER_FIELDS};
use crate::models::{Money, TransactionType, Wallet};
use crate::services::{CategoryService, WalletService};
use crate::storage::Storage;

/// A rejected row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportError {
    /// 1-based line number, counting the header as line 1
    pub line: u64,
    pub message: String,
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    /// Number of rows recorded
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

/// A row that passed parsing
struct ParsedRow {
    date: NaiveDate,
    kind: TransactionType,
    category: String,
    amount: Money,
    description: Option<String>,
}

/// Service for importing transactions from CSV
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Import every valid row from `reader` into `wallet`
    ///
    /// Each line is one row. A wrong or missing header rejects the whole
    /// file with `FinanceError::Import`.
    pub fn import_csv<R: BufRead>(&self, wallet: &mut Wallet, reader: R) -> FinanceResult<ImportResult> {
        let mut lines = reader.lines();

        let header = match lines.next() {
            Some(line) => line.map_err(|e| FinanceError::Import(e.to_string()))?,
            None => String::new(),
        };
        let header_fields = split_csv_line(&header);
        let header_ok = header_fields.len() == CSV_HEADER_FIELDS.len()
            && header_fields
                .iter()
                .zip(CSV_HEADER_FIELDS)
                .all(|(actual, expected)| actual.trim() == expected);
        if !header_ok {
            return Err(FinanceError::Import(format!(
                "Invalid CSV header. Expected: {}",
                CSV_HEADER
            )));
        }

        let categories = CategoryService::new(self.storage);
        let transactions = WalletService::new(self.storage);
        let mut result = ImportResult::default();

        for (index, line) in lines.enumerate() {
            // header is line 1
            let line_number = index as u64 + 2;
            let text = line.map_err(|e| {
                FinanceError::Import(format!("Line {}: {}", line_number, e))
            })?;
            if text.trim().is_empty() {
                continue;
            }

            let fields = split_csv_line(&text);
            let outcome = parse_row(&fields).and_then(|row| {
                let category = categories.resolve(wallet, &row.category)?;
                let timestamp = row.date.and_time(NaiveTime::MIN);
                match row.kind {
                    TransactionType::Income => transactions.append_income(
                        wallet,
                        row.amount,
                        &category,
                        row.description,
                        timestamp,
                    ),
                    TransactionType::Expense => transactions.append_expense(
                        wallet,
                        row.amount,
                        &category,
                        row.description,
                        timestamp,
                    ),
                }
            });

            match outcome {
                Ok(_) => result.imported += 1,
                Err(e) => result.errors.push(ImportError {
                    line: line_number,
                    message: row_message(&e),
                }),
            }
        }

        if result.imported > 0 {
            self.storage.save_wallet(wallet)?;
            self.storage.log_entry(AuditEntry::import(
                EntityType::Wallet,
                wallet.owner_login(),
                format!(
                    "{} imported, {} rejected",
                    result.imported,
                    result.errors.len()
                ),
            ));
        }
        tracing::info!(
            owner = wallet.owner_login(),
            imported = result.imported,
            rejected = result.errors.len(),
            "csv import finished"
        );

        Ok(result)
    }
}

/// Split one line into fields
///
/// A `"` toggles quoting, `""` inside quotes is a literal `"`, and commas
/// split fields only outside quotes. Quoting never continues past the line.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn parse_row(fields: &[String]) -> FinanceResult<ParsedRow> {
    if fields.len() < 4 {
        return Err(FinanceError::InvalidInput(
            "Invalid format (expected at least 4 fields)".into(),
        ));
    }

    let field = |i: usize| fields[i].trim();

    let date = NaiveDate::parse_from_str(field(0), "%Y-%m-%d")
        .map_err(|_| FinanceError::InvalidInput(format!("Invalid date '{}'", field(0))))?;
    let kind: TransactionType = field(1).parse()?;
    let amount = Money::parse(field(3))
        .map_err(|_| FinanceError::InvalidInput(format!("Invalid amount '{}'", field(3))))?;
    if !amount.is_positive() {
        return Err(FinanceError::InvalidAmount(
            "Amount must be greater than 0".into(),
        ));
    }

    let description = fields
        .get(4)
        .filter(|d| !d.trim().is_empty())
        .cloned();

    Ok(ParsedRow {
        date,
        kind,
        category: field(2).to_string(),
        amount,
        description,
    })
}

/// Row-level message without the error-kind prefix
fn row_message(error: &FinanceError) -> String {
    match error {
        FinanceError::InvalidInput(msg) | FinanceError::InvalidAmount(msg) => msg.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet() -> Wallet {
        Wallet::new("alice", Money::from_parts(1000, 0)).unwrap()
    }

    #[test]
    fn test_import_valid_rows() {
        let storage = Storage::in_memory();
        let service = ImportService::new(&storage);
        let mut wallet = wallet();

        let data = "\
Date,Type,Category,Amount,Description
2025-01-10,INCOME,Salary,5000,\"January\"
2025-01-11,EXPENSE,Food,200.50,\"groceries; bread\"
2025-01-12,EXPENSE,food,49.50,\"said \"\"hi\"\"\"
";
        let result = service.import_csv(&mut wallet, data.as_bytes()).unwrap();

        assert_eq!(result.imported, 3);
        assert!(result.errors.is_empty());
        assert_eq!(wallet.balance(), Money::from_parts(5750, 0));

        let budget = wallet.budget_by_name("food").unwrap();
        assert_eq!(budget.category().name(), "Food");
        assert_eq!(budget.spent(), Money::from_parts(250, 0));

        let last = &wallet.transactions()[2];
        assert_eq!(last.description(), Some("said \"hi\""));
        assert_eq!(last.category().name(), "Food");
        assert_eq!(last.timestamp().to_string(), "2025-01-12 00:00:00");

        assert!(storage.wallets.find_by_owner("alice").unwrap().is_some());
    }

    #[test]
    fn test_invalid_header_rejects_everything() {
        let storage = Storage::in_memory();
        let service = ImportService::new(&storage);
        let mut wallet = wallet();

        let data = "When,Kind,Category,Amount\n2025-01-10,INCOME,Salary,5000\n";
        let err = service.import_csv(&mut wallet, data.as_bytes()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Import error: Invalid CSV header. Expected: Date,Type,Category,Amount,Description"
        );
        assert!(wallet.transactions().is_empty());
    }

    #[test]
    fn test_bad_rows_are_reported_and_skipped() {
        let storage = Storage::in_memory();
        let service = ImportService::new(&storage);
        let mut wallet = wallet();

        let data = "\
Date,Type,Category,Amount,Description
2025-01-10,INCOME,Salary

2025-01-11,EXPENSE,Food,0,\"\"
2025-13-01,EXPENSE,Food,5,\"\"
2025-01-12,TRANSFER,Food,5,\"\"
2025-01-13,EXPENSE,Food,abc,\"\"
2025-01-14,EXPENSE,Food,12
";
        let result = service.import_csv(&mut wallet, data.as_bytes()).unwrap();

        assert_eq!(result.imported, 1);
        let lines: Vec<_> = result.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![2, 4, 5, 6, 7]);
        assert_eq!(
            result.errors[0].to_string(),
            "Line 2: Invalid format (expected at least 4 fields)"
        );
        assert_eq!(
            result.errors[1].to_string(),
            "Line 4: Amount must be greater than 0"
        );
        assert_eq!(wallet.balance(), Money::from_parts(988, 0));
    }

    #[test]
    fn test_unterminated_quote_stays_on_its_line() {
        let storage = Storage::in_memory();
        let service = ImportService::new(&storage);
        let mut wallet = wallet();

        let data = "\
Date,Type,Category,Amount,Description
2025-01-10,EXPENSE,Food,5,\"broken
2025-01-11,INCOME,Salary,100,ok
2025-01-12,EXPENSE,Food,7,\"\"
";
        let result = service.import_csv(&mut wallet, data.as_bytes()).unwrap();

        assert_eq!(result.imported, 3);
        assert!(result.errors.is_empty());
        assert_eq!(wallet.balance(), Money::from_parts(1088, 0));
        assert_eq!(wallet.transactions()[0].description(), Some("broken"));
        assert_eq!(wallet.transactions()[1].description(), Some("ok"));
        assert_eq!(wallet.transactions()[2].description(), None);
    }

    #[test]
    fn test_quotes_toggle_inside_unquoted_field() {
        let storage = Storage::in_memory();
        let service = ImportService::new(&storage);
        let mut wallet = wallet();

        let data = "Date,Type,Category,Amount,Description\n2025-01-10,INCOME,Gift,10,say \"\"hi\"\"\n";
        let result = service.import_csv(&mut wallet, data.as_bytes()).unwrap();

        assert_eq!(result.imported, 1);
        assert_eq!(wallet.transactions()[0].description(), Some("say hi"));
    }

    #[test]
    fn test_quoted_comma_does_not_split() {
        assert_eq!(
            split_csv_line("2025-01-10,EXPENSE,Food,5,\"a,b\""),
            vec!["2025-01-10", "EXPENSE", "Food", "5", "a,b"]
        );

        let storage = Storage::in_memory();
        let service = ImportService::new(&storage);
        let mut wallet = wallet();

        let data = "Date,Type,Category,Amount,Description\n2025-01-10,EXPENSE,Food,5,\"a,b\"\n";
        let result = service.import_csv(&mut wallet, data.as_bytes()).unwrap();

        assert_eq!(result.imported, 1);
        assert_eq!(wallet.transactions()[0].description(), Some("a,b"));
    }

    #[test]
    fn test_line_numbers_after_malformed_quoting() {
        let storage = Storage::in_memory();
        let service = ImportService::new(&storage);
        let mut wallet = wallet();

        // line 2 leaves a quote open, swallowing the commas that follow it
        let data = "\
Date,Type,Category,Amount,Description
2025-01-10,\"EXPENSE\"\",Food,5,\"x\"
2025-01-11,EXPENSE,Food,0,\"\"

2025-01-12,INCOME,Salary,50,\"a \"\"b\"\" c\"
2025-01-13,EXPENSE,Food
";
        let result = service.import_csv(&mut wallet, data.as_bytes()).unwrap();

        assert_eq!(result.imported, 1);
        let lines: Vec<_> = result.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![2, 3, 6]);
        assert_eq!(
            result.errors[1].to_string(),
            "Line 3: Amount must be greater than 0"
        );
        assert_eq!(wallet.transactions()[0].description(), Some("a \"b\" c"));
    }

    #[test]
    fn test_missing_header_is_rejected() {
        let storage = Storage::in_memory();
        let service = ImportService::new(&storage);
        let mut wallet = wallet();

        let err = service.import_csv(&mut wallet, "".as_bytes()).unwrap_err();
        assert!(matches!(err, FinanceError::Import(_)));
    }

    #[test]
    fn test_nothing_imported_does_not_save() {
        let storage = Storage::in_memory();
        let service = ImportService::new(&storage);
        let mut wallet = wallet();

        let data = "Date,Type,Category,Amount,Description\n2025-01-11,EXPENSE,Food,-1,\"\"\n";
        let result = service.import_csv(&mut wallet, data.as_bytes()).unwrap();

        assert_eq!(result.imported, 0);
        assert_eq!(result.errors.len(), 1);
        assert!(storage.wallets.find_by_owner("alice").unwrap().is_none());
    }
}
