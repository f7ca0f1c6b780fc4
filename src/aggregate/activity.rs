//! Recent-activity feed

use serde::Serialize;

use crate::models::{EntryKind, Transaction};

/// A transaction tagged with its partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub kind: EntryKind,
    #[serde(flatten)]
    pub transaction: Transaction,
}

/// The `limit` most recent transactions across both partitions, newest first
///
/// Income is listed before expenses ahead of a stable sort, so entries with
/// the same timestamp keep that order.
pub fn recent_activity(
    income: &[Transaction],
    expense: &[Transaction],
    limit: usize,
) -> Vec<ActivityItem> {
    let tagged = |kind: EntryKind| {
        move |t: &Transaction| ActivityItem {
            kind,
            transaction: t.clone(),
        }
    };

    let mut items: Vec<ActivityItem> = income
        .iter()
        .map(tagged(EntryKind::Income))
        .chain(expense.iter().map(tagged(EntryKind::Expense)))
        .collect();

    items.sort_by(|a, b| b.transaction.date.cmp(&a.transaction.date));
    items.truncate(limit);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TransactionId};
    use chrono::{TimeZone, Utc};

    fn txn(id: &str, day: u32) -> Transaction {
        Transaction {
            id: TransactionId::from(id),
            description: id.to_string(),
            amount: Money::from_units(1),
            date: Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap(),
            account: "Cash".into(),
            category: "Misc".into(),
            attachment: None,
        }
    }

    #[test]
    fn test_five_most_recent_descending() {
        let income = vec![txn("i1", 1), txn("i5", 5), txn("i7", 7)];
        let expense = vec![txn("e2", 2), txn("e3", 3), txn("e4", 4), txn("e6", 6)];

        let feed = recent_activity(&income, &expense, 5);
        let ids: Vec<&str> = feed.iter().map(|i| i.transaction.id.as_str()).collect();

        assert_eq!(ids, ["i7", "e6", "i5", "e4", "e3"]);
        assert_eq!(feed[1].kind, EntryKind::Expense);
    }

    #[test]
    fn test_ties_keep_income_first() {
        let feed = recent_activity(&[txn("i", 3)], &[txn("e", 3)], 5);
        assert_eq!(feed[0].transaction.id.as_str(), "i");
        assert_eq!(feed[1].transaction.id.as_str(), "e");
    }

    #[test]
    fn test_fewer_than_limit() {
        assert_eq!(recent_activity(&[txn("a", 1)], &[], 5).len(), 1);
        assert!(recent_activity(&[], &[], 5).is_empty());
        assert!(recent_activity(&[txn("a", 1)], &[], 0).is_empty());
    }
}
