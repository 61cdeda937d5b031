//! Shell command names

use std::str::FromStr;

/// A command typed at the shell prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Register,
    Login,
    Logout,
    AddIncome,
    AddExpense,
    SetBudget,
    ShowBudgets,
    ShowCategories,
    ShowSummary,
    ShowTransactions,
    ExportTransactions,
    ImportTransactions,
    RenameCategory,
    Exit,
}

impl Command {
    /// Commands that operate on the current user's wallet
    pub fn requires_login(&self) -> bool {
        !matches!(
            self,
            Command::Help | Command::Register | Command::Login | Command::Logout | Command::Exit
        )
    }
}

impl FromStr for Command {
    type Err = String;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let command = match s.trim().to_lowercase().as_str() {
            "help" => Command::Help,
            "register" => Command::Register,
            "login" => Command::Login,
            "logout" => Command::Logout,
            "add_income" => Command::AddIncome,
            "add_expense" => Command::AddExpense,
            "set_budget" => Command::SetBudget,
            "show_budgets" => Command::ShowBudgets,
            "show_categories" => Command::ShowCategories,
            "show_summary" => Command::ShowSummary,
            "show_transactions" => Command::ShowTransactions,
            "export_transactions" => Command::ExportTransactions,
            "import_transactions" => Command::ImportTransactions,
            "rename_category" => Command::RenameCategory,
            "exit" => Command::Exit,
            other => return Err(other.to_string()),
        };
        Ok(command)
    }
}

pub const HELP_TEXT: &str = "\
Available commands:
  help                - show this help message
  register            - register a new user
  login               - login as an existing user
  logout              - logout current user
  add_income          - add income transaction for current user
  add_expense         - add expense transaction for current user
  set_budget          - set budget for a category
  show_budgets        - show budgets and remaining limits
  show_categories     - list all categories with budgets
  show_summary        - show income/expenses summary
  show_transactions   - show transactions with filters (type, category, date range)
  export_transactions - export transactions to CSV file
  import_transactions - import transactions from CSV file
  rename_category     - rename a category (updates all transactions and budgets)
  exit                - save and exit the application";
