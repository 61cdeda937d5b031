//! Interactive command shell
//!
//! Reads one command per line, prompts for the command's fields, and calls
//! into the service layer. The logged-in user lives in an explicit
//! [`Session`] that is handed to each handler; nothing is global.

pub mod account;
pub mod budget;
pub mod category;
pub mod command;
pub mod console;
pub mod export;
pub mod import;
pub mod report;
pub mod transaction;

use std::io::{BufRead, Write};

use crate::config::Settings;
use crate::crypto::PasswordHasher;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Money, User};
use crate::services::UserService;
use crate::storage::Storage;

pub use command::{Command, HELP_TEXT};
pub use console::Console;

const LOGIN_REQUIRED: &str =
    "You must be logged in to use this command. Use 'login' or 'register' first.";

/// Who is using the shell
#[derive(Debug, Default)]
pub enum Session {
    #[default]
    Anonymous,
    LoggedIn(User),
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        match self {
            Session::LoggedIn(user) => Some(user),
            Session::Anonymous => None,
        }
    }

    pub fn user_mut(&mut self) -> Option<&mut User> {
        match self {
            Session::LoggedIn(user) => Some(user),
            Session::Anonymous => None,
        }
    }

    /// `[guest] > ` or `[<login>] > `
    pub fn prompt(&self) -> String {
        match self {
            Session::LoggedIn(user) => format!("[{}] > ", user.login()),
            Session::Anonymous => "[guest] > ".to_string(),
        }
    }
}

/// Shared, read-only state for command handlers
pub struct Context<'a> {
    pub storage: &'a Storage,
    pub settings: &'a Settings,
    pub hasher: PasswordHasher,
}

impl<'a> Context<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self {
            storage,
            settings,
            hasher: PasswordHasher::new(),
        }
    }

    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub(crate) fn users(&self) -> UserService<'a> {
        UserService::with_hasher(self.storage, self.hasher.clone())
    }
}

/// Run the shell until `exit` or end of input
pub fn run_shell<R: BufRead, W: Write>(
    ctx: &Context<'_>,
    console: &mut Console<R, W>,
) -> FinanceResult<()> {
    let mut session = Session::Anonymous;

    console.println("=== Personal Finance Manager ===")?;
    console.println("Type 'help' to see available commands.\n")?;

    loop {
        console.print(session.prompt())?;
        let Some(line) = console.read_line()? else {
            console.println("")?;
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(unknown) => {
                tracing::debug!(input = %unknown, "unknown command");
                console.println("Unknown command. Type 'help' to see available commands.")?;
                continue;
            }
        };
        if command == Command::Exit {
            break;
        }

        tracing::debug!(?command, "dispatching");
        if let Err(e) = dispatch(command, ctx, console, &mut session) {
            report_error(console, &e)?;
        }
    }

    if let Err(e) = save_session(ctx, &session) {
        report_error(console, &e)?;
    }
    console.println("Exiting application. Goodbye!")
}

fn dispatch<R: BufRead, W: Write>(
    command: Command,
    ctx: &Context<'_>,
    console: &mut Console<R, W>,
    session: &mut Session,
) -> FinanceResult<()> {
    if !command.requires_login() {
        return match command {
            Command::Help => console.println(HELP_TEXT),
            Command::Register => account::register(ctx, console, session),
            Command::Login => account::login(ctx, console, session),
            Command::Logout => account::logout(console, session),
            _ => Ok(()),
        };
    }

    let Some(user) = session.user_mut() else {
        return console.println(LOGIN_REQUIRED);
    };

    match command {
        Command::AddIncome => transaction::add_income(ctx, console, user),
        Command::AddExpense => transaction::add_expense(ctx, console, user),
        Command::ShowTransactions => transaction::show_transactions(ctx, console, user),
        Command::SetBudget => budget::set_budget(ctx, console, user),
        Command::ShowBudgets => budget::show_budgets(ctx, console, user),
        Command::ShowCategories => category::show_categories(ctx, console, user),
        Command::RenameCategory => category::rename_category(ctx, console, user),
        Command::ShowSummary => report::show_summary(ctx, console, user),
        Command::ExportTransactions => export::export_transactions(ctx, console, user),
        Command::ImportTransactions => import::import_transactions(ctx, console, user),
        Command::Help | Command::Register | Command::Login | Command::Logout | Command::Exit => {
            Ok(())
        }
    }
}

/// Persist the logged-in user's credentials and wallet
fn save_session(ctx: &Context<'_>, session: &Session) -> FinanceResult<()> {
    if let Some(user) = session.user() {
        ctx.users().save(user)?;
        tracing::info!(login = user.login(), "saved session on exit");
    }
    Ok(())
}

fn report_error<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    error: &FinanceError,
) -> FinanceResult<()> {
    if error.is_validation() {
        tracing::debug!(%error, "input rejected");
        console.println(error.to_string())
    } else if error.is_user_facing() {
        tracing::debug!(%error, "command failed");
        console.println(format!("Error: {}", error))
    } else {
        tracing::error!(%error, "internal error");
        console.println(format!("Internal error: {}", error))
    }
}

/// Parse a money amount typed at a prompt
pub(crate) fn parse_amount(input: &str) -> FinanceResult<Money> {
    Money::parse(input)
        .map_err(|_| FinanceError::InvalidInput(format!("Invalid amount format: '{}'", input.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::HashParams;

    fn run(storage: &Storage, input: &str) -> String {
        let settings = Settings::default();
        let ctx = Context::new(storage, &settings)
            .with_hasher(PasswordHasher::with_params(HashParams::insecure_fast()));
        let mut console = Console::new(input.as_bytes(), Vec::new());
        run_shell(&ctx, &mut console).unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn test_guest_prompt_and_unknown_command() {
        let storage = Storage::in_memory();
        let output = run(&storage, "dance\nhelp\nexit\n");

        assert!(output.contains("[guest] > "));
        assert!(output.contains("Unknown command. Type 'help'"));
        assert!(output.contains("show_transactions"));
        assert!(output.ends_with("Exiting application. Goodbye!\n"));
    }

    #[test]
    fn test_commands_require_login() {
        let storage = Storage::in_memory();
        let output = run(&storage, "add_income\nshow_budgets\n");

        assert_eq!(output.matches(LOGIN_REQUIRED).count(), 2);
    }

    #[test]
    fn test_register_logs_in_and_records() {
        let storage = Storage::in_memory();
        let output = run(
            &storage,
            "register\nalice\npw\n1000\n\
             add_income\n5000\nSalary\nJanuary\n\
             add_expense\n200\nFood\n\n\
             set_budget\nfood\n1000\n\
             add_expense\n900\nFOOD\n\n\
             exit\n",
        );

        assert!(output.contains("User 'alice' registered successfully. You are now logged in."));
        assert!(output.contains("[alice] > "));
        assert!(output.contains("Budget set for category 'Food': 1000"));
        assert!(output.contains(
            "WARNING: Budget limit exceeded for category 'Food' (remaining: -100)."
        ));

        let user = storage.users.find_by_login("alice").unwrap().unwrap();
        assert_eq!(user.wallet().balance(), Money::from_parts(4900, 0));
        assert_eq!(user.wallet().budget_count(), 1);
    }

    #[test]
    fn test_login_refused_while_logged_in() {
        let storage = Storage::in_memory();
        let output = run(&storage, "register\nbob\npw\n0\nlogin\nlogout\nlogout\n");

        assert!(output.contains("You are already logged in as 'bob'. Please logout first."));
        assert!(output.contains("Logging out user: bob"));
        assert!(output.contains("No user is currently logged in."));
    }

    #[test]
    fn test_wrong_password() {
        let storage = Storage::in_memory();
        run(&storage, "register\ncarol\npw\n0\nexit\n");
        let output = run(&storage, "login\ncarol\nnope\nexit\n");

        assert!(output.contains("Error: Invalid login or password"));
        assert!(!output.contains("[carol] > "));
    }

    #[test]
    fn test_rejected_input_is_not_reported_as_failure() {
        let storage = Storage::in_memory();
        let output = run(
            &storage,
            "register\nerin\npw\n0\nadd_income\nlots\nadd_expense\n-5\nFood\n\nexit\n",
        );

        assert!(output.contains("Invalid input: Invalid amount format: 'lots'"));
        assert!(!output.contains("Error: Invalid input"));
        let user = storage.users.find_by_login("erin").unwrap().unwrap();
        assert!(user.wallet().transactions().is_empty());
    }

    #[test]
    fn test_end_of_input_mid_command() {
        let storage = Storage::in_memory();
        let output = run(&storage, "register\ndave\n");

        assert!(output.contains("input ended before the command was complete"));
        assert!(output.ends_with("Goodbye!\n"));
        assert!(!storage.users.exists("dave").unwrap());
    }
}
