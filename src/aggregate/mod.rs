//! Aggregation engine
//!
//! Pure functions over explicit slices of entities. Nothing here touches the
//! store or storage; identical inputs always give identical outputs.

pub mod activity;
pub mod balance;
pub mod breakdown;
pub mod budget;
pub mod cache;
pub mod filter;
pub mod report;

pub use activity::{recent_activity, ActivityItem};
pub use balance::total_balance;
pub use breakdown::{category_breakdown, spending_by_category, CategoryBreakdown, CategoryTotal};
pub use budget::{budget_progress, BudgetProgress};
pub use cache::{Dashboard, DashboardCache};
pub use filter::{FilteredTotals, TransactionFilter};
pub use report::{account_report, account_reports, AccountReport, IncomeVsExpenses, ReportKind};
