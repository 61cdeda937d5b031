use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use finance_manager::cli::{run_shell, Console, Context};
use finance_manager::config::{paths::DATA_DIR_ENV, FinancePaths, Settings};
use finance_manager::logging::init_tracing;
use finance_manager::storage::Storage;

#[derive(Parser)]
#[command(
    name = "finance",
    version,
    about = "Terminal personal finance tracker",
    long_about = "Track income and expenses per user, set spending limits per \
                  category, and import or export transactions as CSV. \
                  Commands are read from standard input, one per line."
)]
struct Cli {
    /// Directory for config.json, data/ and audit.log
    #[arg(long, value_name = "PATH", env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = FinancePaths::resolve(cli.data_dir)?;
    let settings = Settings::load_or_create(&paths)?;

    let mut storage = Storage::new(paths.clone())?;
    if !paths.settings_file().exists() {
        settings.save(&paths)?;
    }
    if !settings.audit_enabled {
        storage = storage.without_audit();
    }
    tracing::debug!(base_dir = %paths.base_dir().display(), "storage ready");

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let ctx = Context::new(&storage, &settings);
    let mut console =
        Console::new(stdin.lock(), io::stdout().lock()).with_hidden_passwords(interactive);

    run_shell(&ctx, &mut console)?;
    Ok(())
}
