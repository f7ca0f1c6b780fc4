//! Account CLI commands

use clap::Subcommand;

use super::parse_amount;
use crate::aggregate::total_balance;
use crate::config::Settings;
use crate::display::account::{format_account_details, format_account_list};
use crate::error::{LedgerResult, ValidationError};
use crate::models::{Account, AccountPatch};
use crate::store::LedgerStore;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account name
        name: String,
        /// Starting balance (e.g., "1000.00" or "1000")
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
        /// Currency code; defaults to the configured currency
        #[arg(short, long)]
        currency: Option<String>,
        /// Leave the account out of the dashboard total
        #[arg(long)]
        exclude: bool,
    },
    /// List all accounts with the dashboard total
    List,
    /// Show account details
    Show {
        /// Account name or ID
        account: String,
    },
    /// Edit an account
    Edit {
        /// Account name or ID
        account: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New balance
        #[arg(short, long, allow_hyphen_values = true)]
        balance: Option<String>,
        /// New currency code
        #[arg(short, long)]
        currency: Option<String>,
    },
    /// Count the account in the dashboard total
    Include {
        /// Account name or ID
        account: String,
    },
    /// Leave the account out of the dashboard total
    Exclude {
        /// Account name or ID
        account: String,
    },
    /// Delete an account; its transactions are kept
    Delete {
        /// Account name or ID
        account: String,
    },
}

fn find(store: &LedgerStore, identifier: &str) -> LedgerResult<Account> {
    store
        .find_account(identifier)
        .cloned()
        .ok_or_else(|| ValidationError::account_not_found(identifier).into())
}

/// Handle an account command
pub async fn handle_account_command(
    store: &mut LedgerStore,
    settings: &Settings,
    cmd: AccountCommands,
) -> LedgerResult<()> {
    match cmd {
        AccountCommands::Create {
            name,
            balance,
            currency,
            exclude,
        } => {
            let balance = parse_amount(&balance)?;
            let currency = currency.unwrap_or_else(|| settings.default_currency.clone());
            let mut account = store.create_account(&name, balance, &currency).await?;
            if exclude {
                account = store.set_include_in_total(&account.id, false).await?;
            }

            println!("Created account: {}", account.name);
            print!("{}", format_account_details(&account));
        }

        AccountCommands::List => {
            let accounts = store.accounts();
            print!("{}", format_account_list(accounts, total_balance(accounts)));
        }

        AccountCommands::Show { account } => {
            print!("{}", format_account_details(&find(store, &account)?));
        }

        AccountCommands::Edit {
            account,
            name,
            balance,
            currency,
        } => {
            let found = find(store, &account)?;
            if name.is_none() && balance.is_none() && currency.is_none() {
                println!("No changes specified. Use --name, --balance or --currency.");
                return Ok(());
            }

            let mut patch = AccountPatch::default();
            if let Some(name) = name {
                patch = patch.name(name);
            }
            if let Some(balance) = balance {
                patch = patch.balance(parse_amount(&balance)?);
            }
            if let Some(currency) = currency {
                patch = patch.currency(currency);
            }

            let updated = store.update_account(&found.id, patch).await?;
            println!("Updated account: {}", updated.name);
        }

        AccountCommands::Include { account } => {
            let found = find(store, &account)?;
            store.set_include_in_total(&found.id, true).await?;
            println!("{} is counted in the total", found.name);
        }

        AccountCommands::Exclude { account } => {
            let found = find(store, &account)?;
            store.set_include_in_total(&found.id, false).await?;
            println!("{} is left out of the total", found.name);
        }

        AccountCommands::Delete { account } => {
            let found = find(store, &account)?;
            store.delete_account(&found.id).await?;
            println!("Deleted account: {}", found.name);
        }
    }

    Ok(())
}
