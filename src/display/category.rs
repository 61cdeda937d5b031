//! Category display formatting

use crate::models::Category;

/// Format a simple list of categories, one per line
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories with budgets yet.".to_string();
    }

    let mut output = String::new();
    for category in categories {
        output.push_str(&format!(" - {}\n", category.name()));
    }
    output
}
