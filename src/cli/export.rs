//! export_transactions

use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::PathBuf;

use super::transaction::read_filter;
use super::{Console, Context};
use crate::error::{FinanceError, FinanceResult};
use crate::export::export_transactions_csv;
use crate::models::User;
use crate::services::WalletService;

pub fn export_transactions<R: BufRead, W: Write>(
    ctx: &Context<'_>,
    console: &mut Console<R, W>,
    user: &mut User,
) -> FinanceResult<()> {
    console.println("--- Export transactions to CSV ---")?;
    let wallet = user.wallet();
    let filter = read_filter(ctx, console, wallet, "Exporting all transactions.")?;

    let default_file = &ctx.settings.default_export_file;
    let file_name = console.ask(&format!("Output file name (default: {}): ", default_file))?;
    let path = export_path(&file_name, default_file);

    let transactions = WalletService::new(ctx.storage).transactions(wallet, &filter);
    if transactions.is_empty() {
        return console.println("No transactions found matching the criteria. Export cancelled.");
    }

    let file = File::create(&path).map_err(|e| {
        FinanceError::Export(format!("Cannot create {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    let count = export_transactions_csv(&mut writer, transactions.iter().copied())?;

    tracing::info!(
        owner = wallet.owner_login(),
        count,
        path = %path.display(),
        "exported transactions"
    );
    console.println(format!(
        "Exported {} transaction(s) to {}",
        count,
        path.display()
    ))
}

/// Typed name or the default, with `.csv` appended when missing
fn export_path(input: &str, default_file: &str) -> PathBuf {
    let name = match input.trim() {
        "" => default_file,
        typed => typed,
    };
    if name.ends_with(".csv") {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("{}.csv", name))
    }
}
