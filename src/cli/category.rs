//! show_categories and rename_category

use std::io::{BufRead, Write};

use super::{Console, Context};
use crate::display::format_category_list;
use crate::error::FinanceResult;
use crate::models::User;
use crate::services::CategoryService;

pub fn show_categories<R: BufRead, W: Write>(
    ctx: &Context<'_>,
    console: &mut Console<R, W>,
    user: &mut User,
) -> FinanceResult<()> {
    console.println("--- Categories (with budgets) ---")?;
    let categories = CategoryService::new(ctx.storage).list_categories(user.wallet());
    console.println(format_category_list(&categories).trim_end())
}

pub fn rename_category<R: BufRead, W: Write>(
    ctx: &Context<'_>,
    console: &mut Console<R, W>,
    user: &mut User,
) -> FinanceResult<()> {
    console.println("--- Rename category ---")?;
    let old_name = console.ask("Current category name: ")?;
    let old_name = old_name.trim();
    if old_name.is_empty() {
        return console.println("Category name cannot be empty.");
    }

    let service = CategoryService::new(ctx.storage);
    let wallet = user.wallet_mut();
    let Some(old) = service.find_by_name(wallet, old_name) else {
        return console.println(format!("Category '{}' not found.", old_name));
    };

    let new_name = console.ask("New category name: ")?;
    if new_name.trim().is_empty() {
        return console.println("New category name cannot be empty.");
    }

    let renamed = service.rename(wallet, &old, &new_name)?;
    console.println(format!(
        "Category renamed from '{}' to '{}'.",
        old.name(),
        renamed.name()
    ))
}
