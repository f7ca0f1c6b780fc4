use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use moneyflow::cli::{
    handle_account_command, handle_backup_command, handle_budget_command,
    handle_category_command, handle_dashboard_command, handle_report_command,
    handle_transaction_command,
};
use moneyflow::config::{LedgerPaths, Settings};
use moneyflow::kv::DurableKv;
use moneyflow::store::LedgerStore;

/// Environment variable holding the log filter
const LOG_ENV: &str = "MONEYFLOW_LOG";

#[derive(Parser)]
#[command(
    name = "moneyflow",
    version,
    about = "Local personal-finance ledger",
    long_about = "MoneyFlow keeps accounts, income and expense transactions, \
                  categories and budgets on this device, and derives balances, \
                  activity feeds and per-account reports from them."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Account management commands
    #[command(subcommand)]
    Account(moneyflow::cli::AccountCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(moneyflow::cli::CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "transaction")]
    Txn(moneyflow::cli::TransactionCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(moneyflow::cli::BudgetCommands),

    /// Total balance, recent activity and spending by category
    Dashboard {
        /// Number of recent transactions to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Per-account reports
    Report(moneyflow::cli::ReportArgs),

    /// Backup, restore and snapshot commands
    #[command(subcommand)]
    Backup(moneyflow::cli::BackupCommands),

    /// Show current configuration and paths
    Config,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let paths = LedgerPaths::new()?;
    paths
        .ensure_directories()
        .context("Failed to prepare the data directory")?;
    let settings = Settings::load_or_create(&paths)?;

    let mut store = LedgerStore::open(DurableKv::open(&paths), &settings)
        .await
        .context("Failed to open the ledger")?;

    match cli.command {
        Some(Commands::Account(cmd)) => {
            handle_account_command(&mut store, &settings, cmd).await?;
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&mut store, cmd).await?;
        }
        Some(Commands::Txn(cmd)) => {
            handle_transaction_command(&mut store, cmd).await?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&mut store, cmd).await?;
        }
        Some(Commands::Dashboard { limit, json }) => {
            handle_dashboard_command(&store, &settings, limit, json)?;
        }
        Some(Commands::Report(args)) => {
            handle_report_command(&store, &settings, args)?;
        }
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&mut store, &paths, &settings, cmd).await?;
        }
        Some(Commands::Config) => {
            println!("MoneyFlow Configuration");
            println!("=======================");
            println!("Data directory:   {}", paths.base_dir().display());
            println!("Database:         {}", paths.database_file().display());
            println!("Fallback store:   {}", paths.fallback_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Storage backend:  {}", store.kv().active_backend().await);
            println!();
            println!("Settings:");
            println!("  Default currency:   {}", settings.default_currency);
            println!("  Recent activity:    {}", settings.recent_activity_limit);
            println!("  Largest expenses:   {}", settings.largest_expenses_limit);
            println!("  Backups kept:       {}", settings.backup_retention.keep);
        }
        None => {
            println!("MoneyFlow - local personal-finance ledger");
            println!();
            println!("Run 'moneyflow --help' for usage information.");
            println!("Run 'moneyflow dashboard' for an overview.");
        }
    }

    Ok(())
}
