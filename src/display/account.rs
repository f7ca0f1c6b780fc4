//! Account display formatting

use tabled::Tabled;

use super::table;
use crate::models::{Account, Money};

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "In Total")]
    in_total: &'static str,
    #[tabled(rename = "ID")]
    id: String,
}

/// Accounts as a table followed by the dashboard total
pub fn format_account_list(accounts: &[Account], total: Money) -> String {
    let rows = accounts
        .iter()
        .map(|a| AccountRow {
            name: a.name.clone(),
            balance: a.balance.format_with_currency(&a.currency),
            in_total: if a.include_in_total { "yes" } else { "no" },
            id: a.id.to_string(),
        })
        .collect();

    let mut output = table(rows, "No accounts found.");
    if !accounts.is_empty() {
        output.push_str(&format!("Total balance: {}\n", total));
    }
    output
}

pub fn format_account_details(account: &Account) -> String {
    format!(
        "Account: {}\n  ID:       {}\n  Balance:  {}\n  In total: {}\n",
        account.name,
        account.id,
        account.balance.format_with_currency(&account.currency),
        if account.include_in_total { "yes" } else { "no" },
    )
}
