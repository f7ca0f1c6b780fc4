//! Transaction CLI commands

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use super::{parse_amount, parse_date, parse_kind};
use crate::aggregate::TransactionFilter;
use crate::display::{format_transaction_details, format_transaction_list};
use crate::error::{LedgerError, LedgerResult, ValidationError};
use crate::export::{export_accounts_csv, export_transactions_csv};
use crate::models::{EntryKind, TransactionDraft, TransactionId, TransactionPatch};
use crate::store::LedgerStore;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction
    Add {
        /// income or expense
        #[arg(value_parser = parse_kind)]
        kind: EntryKind,
        /// What the transaction was for
        description: String,
        /// Signed amount; expenses are usually negative
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Account name
        #[arg(short, long)]
        account: String,
        /// Category name
        #[arg(short, long)]
        category: String,
        /// Transaction date (YYYY-MM-DD); defaults to now
        #[arg(short, long)]
        date: Option<String>,
        /// File to store as the receipt attachment
        #[arg(long)]
        attachment: Option<PathBuf>,
    },
    /// List transactions, newest first
    List {
        /// Only one kind (income or expense)
        #[arg(short, long, value_parser = parse_kind)]
        kind: Option<EntryKind>,
        /// Only these accounts (repeatable)
        #[arg(short, long)]
        account: Vec<String>,
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show one transaction
    Show {
        /// Transaction ID
        id: String,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        account: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Replace the receipt attachment with this file
        #[arg(long, conflicts_with = "clear_attachment")]
        attachment: Option<PathBuf>,
        /// Remove the receipt attachment
        #[arg(long)]
        clear_attachment: bool,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
    /// Write transactions (or accounts) to a CSV file
    Export {
        /// Output file path
        output: PathBuf,
        /// Export accounts instead of transactions
        #[arg(long)]
        accounts: bool,
    },
}

fn read_attachment(path: &Path) -> LedgerResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        LedgerError::Io(format!("Failed to read attachment {}: {}", path.display(), e))
    })
}

/// Handle a transaction command
pub async fn handle_transaction_command(
    store: &mut LedgerStore,
    cmd: TransactionCommands,
) -> LedgerResult<()> {
    match cmd {
        TransactionCommands::Add {
            kind,
            description,
            amount,
            account,
            category,
            date,
            attachment,
        } => {
            let date = match date {
                Some(date) => parse_date(&date)?,
                None => chrono::Utc::now(),
            };
            let mut draft =
                TransactionDraft::new(description, parse_amount(&amount)?, date, account, category);
            if let Some(path) = attachment {
                draft = draft.with_attachment(read_attachment(&path)?);
            }

            let txn = store.create_transaction(kind, draft).await?;
            println!("Recorded {} transaction {}", kind, txn.id);
        }

        TransactionCommands::List {
            kind,
            account,
            category,
            limit,
        } => {
            let filter = TransactionFilter {
                accounts: account,
                category,
            };
            let kinds = match kind {
                Some(kind) => vec![kind],
                None => EntryKind::ALL.to_vec(),
            };

            let mut rows = Vec::new();
            for kind in &kinds {
                rows.extend(filter.apply(store.transactions(*kind)).into_iter().map(|t| (*kind, t)));
            }
            rows.sort_by(|a, b| b.1.date.cmp(&a.1.date));
            let shown = rows.len().min(limit);
            print!("{}", format_transaction_list(&rows[..shown]));
            if shown < rows.len() {
                println!("Showing {} of {} transactions", shown, rows.len());
            }

            let totals = filter.totals(
                store.transactions(EntryKind::Income),
                store.transactions(EntryKind::Expense),
            );
            println!(
                "Income: {} ({})  Expenses: {} ({})  Net: {}",
                totals.totals.total_income,
                totals.income_count,
                totals.totals.total_expenses,
                totals.expense_count,
                totals.totals.net,
            );
        }

        TransactionCommands::Show { id } => {
            let id = TransactionId::from(id.as_str());
            let (kind, txn) = store
                .transaction(&id)
                .ok_or_else(|| ValidationError::transaction_not_found(id.as_str()))?;
            print!("{}", format_transaction_details(kind, txn));
        }

        TransactionCommands::Edit {
            id,
            description,
            amount,
            date,
            account,
            category,
            attachment,
            clear_attachment,
        } => {
            let mut patch = TransactionPatch::default();
            if let Some(description) = description {
                patch = patch.description(description);
            }
            if let Some(amount) = amount {
                patch = patch.amount(parse_amount(&amount)?);
            }
            if let Some(date) = date {
                patch = patch.date(parse_date(&date)?);
            }
            if let Some(account) = account {
                patch = patch.account(account);
            }
            if let Some(category) = category {
                patch = patch.category(category);
            }
            if let Some(path) = attachment {
                patch = patch.attachment(Some(read_attachment(&path)?));
            } else if clear_attachment {
                patch = patch.attachment(None);
            }

            let txn = store
                .update_transaction(&TransactionId::from(id.as_str()), patch)
                .await?;
            println!("Updated transaction {}", txn.id);
        }

        TransactionCommands::Delete { id } => {
            let id = TransactionId::from(id.as_str());
            if store.transaction(&id).is_none() {
                return Err(ValidationError::transaction_not_found(id.as_str()).into());
            }
            store.delete_transaction(&id).await?;
            println!("Deleted transaction {}", id);
        }

        TransactionCommands::Export { output, accounts } => {
            let file = File::create(&output).map_err(|e| {
                LedgerError::Export(format!("Failed to create {}: {}", output.display(), e))
            })?;
            let writer = BufWriter::new(file);
            if accounts {
                export_accounts_csv(store.accounts(), writer)?;
                println!("Exported {} accounts to {}", store.accounts().len(), output.display());
            } else {
                let all = store.all_transactions();
                let count = all.len();
                export_transactions_csv(all, writer)?;
                println!("Exported {} transactions to {}", count, output.display());
            }
        }
    }

    Ok(())
}
