//! Dashboard total balance

use crate::models::{Account, Money};

/// Sum of balances over accounts that count toward the total
///
/// Currencies are not converted; a single reporting currency is assumed.
pub fn total_balance(accounts: &[Account]) -> Money {
    accounts
        .iter()
        .filter(|a| a.include_in_total)
        .map(|a| a.balance)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str, balance: i64, include: bool) -> Account {
        let mut account = Account::new(name, Money::from_units(balance), "USD");
        account.include_in_total = include;
        account
    }

    #[test]
    fn test_excluded_accounts_do_not_count() {
        let accounts = vec![account("A", 100, true), account("B", 50, false)];
        assert_eq!(total_balance(&accounts), Money::from_units(100));
    }

    #[test]
    fn test_empty_is_zero() {
        assert!(total_balance(&[]).is_zero());
    }

    #[test]
    fn test_negative_balances_subtract() {
        let accounts = vec![account("A", 100, true), account("Card", -30, true)];
        assert_eq!(total_balance(&accounts), Money::from_units(70));
    }

    #[test]
    fn test_out_of_range_balances_do_not_panic() {
        let huge = Money::from_f64(5e28).unwrap();
        let accounts = vec![
            Account::new("A", huge, "USD"),
            Account::new("B", huge, "USD"),
        ];
        assert!(total_balance(&accounts) >= huge);
    }
}
