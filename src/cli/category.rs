//! Category CLI commands

use clap::Subcommand;

use super::parse_kind;
use crate::display::format_category_list;
use crate::error::LedgerResult;
use crate::models::EntryKind;
use crate::store::LedgerStore;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories
    List {
        /// Only one kind (income or expense)
        #[arg(short, long, value_parser = parse_kind)]
        kind: Option<EntryKind>,
    },
    /// Create a category
    Create {
        /// income or expense
        #[arg(value_parser = parse_kind)]
        kind: EntryKind,
        /// Category name
        name: String,
    },
    /// Rename a category; existing transactions keep the old name
    Rename {
        #[arg(value_parser = parse_kind)]
        kind: EntryKind,
        /// Current name
        old: String,
        /// New name
        new: String,
    },
    /// Delete a category
    Delete {
        #[arg(value_parser = parse_kind)]
        kind: EntryKind,
        name: String,
    },
}

/// Handle a category command
pub async fn handle_category_command(
    store: &mut LedgerStore,
    cmd: CategoryCommands,
) -> LedgerResult<()> {
    match cmd {
        CategoryCommands::List { kind } => {
            let kinds = match kind {
                Some(kind) => vec![kind],
                None => EntryKind::ALL.to_vec(),
            };
            for kind in kinds {
                print!("{}", format_category_list(kind, store.categories(kind)));
            }
        }

        CategoryCommands::Create { kind, name } => {
            let name = store.create_category(kind, &name).await?;
            println!("Created {} category: {}", kind, name);
        }

        CategoryCommands::Rename { kind, old, new } => {
            let name = store.rename_category(kind, &old, &new).await?;
            println!("Renamed {} category '{}' to '{}'", kind, old, name);
        }

        CategoryCommands::Delete { kind, name } => {
            if !store.has_category(kind, &name) {
                println!("No {} category named '{}'", kind, name);
                return Ok(());
            }
            store.delete_category(kind, &name).await?;
            println!("Deleted {} category: {}", kind, name);
        }
    }

    Ok(())
}
