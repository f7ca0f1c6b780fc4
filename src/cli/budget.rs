//! Budget CLI commands

use clap::Subcommand;

use super::{parse_amount, parse_kind};
use crate::aggregate::{budget_progress, BudgetProgress};
use crate::display::format_budget_list;
use crate::error::{LedgerResult, ValidationError};
use crate::models::{BudgetId, BudgetPatch, EntryKind};
use crate::store::LedgerStore;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show budgets with their progress
    List {
        #[arg(short, long, value_parser = parse_kind)]
        kind: Option<EntryKind>,
    },
    /// Create a budget for a category
    Create {
        #[arg(value_parser = parse_kind)]
        kind: EntryKind,
        /// Category name
        category: String,
        /// Spending limit
        limit: String,
    },
    /// Edit a budget
    Edit {
        /// Budget ID
        id: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        limit: Option<String>,
        /// Overwrite the spent counter
        #[arg(long)]
        spent: Option<String>,
    },
    /// Add to a budget's spent counter
    Spend {
        /// Budget ID
        id: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Delete a budget
    Delete {
        /// Budget ID
        id: String,
    },
}

/// Handle a budget command
pub async fn handle_budget_command(store: &mut LedgerStore, cmd: BudgetCommands) -> LedgerResult<()> {
    match cmd {
        BudgetCommands::List { kind } => {
            let kinds = match kind {
                Some(kind) => vec![kind],
                None => EntryKind::ALL.to_vec(),
            };
            let progress: Vec<BudgetProgress> = kinds
                .into_iter()
                .flat_map(|kind| budget_progress(kind, store.budgets(kind)))
                .collect();
            print!("{}", format_budget_list(&progress));
        }

        BudgetCommands::Create {
            kind,
            category,
            limit,
        } => {
            let budget = store
                .create_budget(kind, &category, parse_amount(&limit)?)
                .await?;
            println!("Created {} budget for {}: {}", kind, budget.category, budget.limit);
            println!("  ID: {}", budget.id);
        }

        BudgetCommands::Edit {
            id,
            category,
            limit,
            spent,
        } => {
            let mut patch = BudgetPatch::default();
            if let Some(category) = category {
                patch = patch.category(category);
            }
            if let Some(limit) = limit {
                patch = patch.limit(parse_amount(&limit)?);
            }
            if let Some(spent) = spent {
                patch = patch.spent(parse_amount(&spent)?);
            }
            let budget = store.update_budget(&BudgetId::from(id.as_str()), patch).await?;
            println!("Updated budget for {}", budget.category);
        }

        BudgetCommands::Spend { id, amount } => {
            let id = BudgetId::from(id.as_str());
            let Some((kind, _)) = store.budget(&id) else {
                return Err(ValidationError::budget_not_found(id.as_str()).into());
            };
            let budget = store
                .record_budget_spending(&id, parse_amount(&amount)?)
                .await?;
            print!("{}", format_budget_list(&[BudgetProgress::of(kind, &budget)]));
        }

        BudgetCommands::Delete { id } => {
            store.delete_budget(&BudgetId::from(id.as_str())).await?;
            println!("Deleted budget {}", id);
        }
    }

    Ok(())
}
