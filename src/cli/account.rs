//! register, login and logout

use std::io::{BufRead, Write};

use super::{parse_amount, Console, Context, Session};
use crate::error::FinanceResult;

/// Register a user and log them in
pub fn register<R: BufRead, W: Write>(
    ctx: &Context<'_>,
    console: &mut Console<R, W>,
    session: &mut Session,
) -> FinanceResult<()> {
    console.println("--- User registration ---")?;
    let login = console.ask("Login: ")?;
    let password = console.ask_password("Password: ")?;
    let initial_balance = parse_amount(&console.ask("Initial balance (e.g. 0 or 1000): ")?)?;

    let user = ctx.users().register(&login, &password, initial_balance)?;
    console.println(format!(
        "User '{}' registered successfully. You are now logged in.",
        user.login()
    ))?;
    *session = Session::LoggedIn(user);
    Ok(())
}

pub fn login<R: BufRead, W: Write>(
    ctx: &Context<'_>,
    console: &mut Console<R, W>,
    session: &mut Session,
) -> FinanceResult<()> {
    if let Some(user) = session.user() {
        return console.println(format!(
            "You are already logged in as '{}'. Please logout first.",
            user.login()
        ));
    }

    console.println("--- Login ---")?;
    let login = console.ask("Login: ")?;
    let password = console.ask_password("Password: ")?;

    let user = ctx.users().login(&login, &password)?;
    tracing::info!(login = user.login(), "logged in");
    console.println(format!("Login successful. Current user: {}", user.login()))?;
    *session = Session::LoggedIn(user);
    Ok(())
}

pub fn logout<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    session: &mut Session,
) -> FinanceResult<()> {
    match std::mem::take(session) {
        Session::LoggedIn(user) => {
            console.println(format!("Logging out user: {}", user.login()))
        }
        Session::Anonymous => console.println("No user is currently logged in."),
    }
}
