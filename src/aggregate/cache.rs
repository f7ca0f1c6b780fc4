//! Memoized dashboard view
//!
//! The dashboard is recomputed only when the store revision (or the feed
//! length) differs from the one it was last computed for.

use serde::Serialize;

use super::activity::{recent_activity, ActivityItem};
use super::balance::total_balance;
use super::breakdown::{category_breakdown, CategoryBreakdown};
use crate::models::Money;
use crate::store::LedgerSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_balance: Money,
    pub recent_activity: Vec<ActivityItem>,
    pub category_breakdown: CategoryBreakdown,
}

impl Dashboard {
    pub fn compute(snapshot: &LedgerSnapshot, activity_limit: usize) -> Self {
        Self {
            total_balance: total_balance(&snapshot.accounts),
            recent_activity: recent_activity(
                &snapshot.income_transactions,
                &snapshot.expense_transactions,
                activity_limit,
            ),
            category_breakdown: category_breakdown(&snapshot.expense_transactions),
        }
    }
}

#[derive(Debug, Default)]
pub struct DashboardCache {
    entry: Option<(u64, usize, Dashboard)>,
    computations: usize,
}

impl DashboardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The dashboard for `revision`, computing it if the cached one is stale
    pub fn get(
        &mut self,
        revision: u64,
        snapshot: &LedgerSnapshot,
        activity_limit: usize,
    ) -> &Dashboard {
        let fresh = matches!(
            &self.entry,
            Some((rev, limit, _)) if *rev == revision && *limit == activity_limit
        );
        if !fresh {
            self.entry = None;
        }
        let computations = &mut self.computations;
        let (_, _, dashboard) = self.entry.get_or_insert_with(|| {
            *computations += 1;
            (revision, activity_limit, Dashboard::compute(snapshot, activity_limit))
        });
        dashboard
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// How many times the dashboard has been computed
    pub fn computations(&self) -> usize {
        self.computations
    }
}
