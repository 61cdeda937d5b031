//! import_transactions

use std::fs::File;
use std::io::{BufRead, BufReader, Write};

use super::{Console, Context};
use crate::error::{FinanceError, FinanceResult};
use crate::models::User;
use crate::services::ImportService;

pub fn import_transactions<R: BufRead, W: Write>(
    ctx: &Context<'_>,
    console: &mut Console<R, W>,
    user: &mut User,
) -> FinanceResult<()> {
    console.println("--- Import transactions from CSV ---")?;
    let file_name = console.ask("CSV file name: ")?;
    let file_name = file_name.trim();
    if file_name.is_empty() {
        return console.println("File name cannot be empty.");
    }

    let file = File::open(file_name)
        .map_err(|e| FinanceError::Import(format!("Cannot read {}: {}", file_name, e)))?;
    let result = ImportService::new(ctx.storage).import_csv(user.wallet_mut(), BufReader::new(file))?;

    if result.errors.is_empty() {
        return console.println(format!(
            "Imported {} transaction(s).",
            result.imported
        ));
    }

    console.println(format!(
        "Imported {} transaction(s) with {} error(s):",
        result.imported,
        result.errors.len()
    ))?;
    for error in &result.errors {
        console.println(format!("  - {}", error))?;
    }
    Ok(())
}
