//! Category and budget display formatting

use tabled::Tabled;

use super::report::format_percentage;
use super::table;
use crate::aggregate::BudgetProgress;
use crate::models::EntryKind;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Category")]
    name: String,
}

pub fn format_category_list(kind: EntryKind, categories: &[String]) -> String {
    let rows = categories
        .iter()
        .enumerate()
        .map(|(i, name)| CategoryRow {
            position: i + 1,
            name: name.clone(),
        })
        .collect();

    let mut output = format!("{} categories\n", kind);
    output.push_str(&table(rows, "No categories."));
    output
}

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Kind")]
    kind: EntryKind,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "ID")]
    id: String,
}

pub fn format_budget_list(progress: &[BudgetProgress]) -> String {
    let rows = progress
        .iter()
        .map(|p| BudgetRow {
            kind: p.kind,
            category: p.category.clone(),
            limit: p.limit.to_string(),
            spent: p.spent.to_string(),
            remaining: p.remaining.to_string(),
            used: if p.is_over() {
                format!("{} OVER", format_percentage(p.percent_used))
            } else {
                format_percentage(p.percent_used)
            },
            id: p.id.to_string(),
        })
        .collect();
    table(rows, "No budgets found.")
}
