//! Command-line smoke tests against a throwaway data directory

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn moneyflow(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("moneyflow").unwrap();
    cmd.env("MONEYFLOW_DATA_DIR", data_dir.path())
        .env("MONEYFLOW_LOG", "off");
    cmd
}

#[test]
fn account_create_and_list() {
    let dir = TempDir::new().unwrap();

    moneyflow(&dir)
        .args(["account", "create", "Checking", "--balance", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created account: Checking"));

    moneyflow(&dir)
        .args(["account", "create", "Savings", "--balance", "50", "--exclude"])
        .assert()
        .success();

    moneyflow(&dir)
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Savings"))
        .stdout(predicate::str::contains("Total balance: 100.00"));
}

#[test]
fn duplicate_account_is_rejected() {
    let dir = TempDir::new().unwrap();
    moneyflow(&dir).args(["account", "create", "Cash"]).assert().success();

    moneyflow(&dir)
        .args(["account", "create", "Cash"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Account already exists: Cash"));
}

#[test]
fn transactions_feed_the_dashboard() {
    let dir = TempDir::new().unwrap();
    moneyflow(&dir)
        .args(["account", "create", "Checking", "--balance", "1000"])
        .assert()
        .success();

    moneyflow(&dir)
        .args([
            "txn", "add", "expense", "Groceries", "-42.50", "--account", "Checking",
            "--category", "Food", "--date", "2025-05-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded Expense transaction"));

    moneyflow(&dir)
        .args(["dashboard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total balance: 1000.00"))
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("42.50"));

    moneyflow(&dir)
        .args(["txn", "list", "--category", "Food"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Expenses: -42.50 (1)"));
}

#[test]
fn default_categories_are_seeded() {
    let dir = TempDir::new().unwrap();

    moneyflow(&dir)
        .args(["category", "list", "--kind", "expense"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transportation"));
}

#[test]
fn unknown_kind_is_a_usage_error() {
    let dir = TempDir::new().unwrap();

    moneyflow(&dir)
        .args(["category", "create", "transfer", "Misc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a kind"));
}

#[test]
fn report_sections_and_csv() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("report.csv");
    moneyflow(&dir).args(["account", "create", "Checking"]).assert().success();
    moneyflow(&dir)
        .args([
            "txn", "add", "income", "Paycheck", "3000", "--account", "Checking",
            "--category", "Salary",
        ])
        .assert()
        .success();

    moneyflow(&dir)
        .args(["report", "--section", "income-vs-expenses", "--csv"])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Income vs Expenses"))
        .stdout(predicate::str::contains("Largest Expenses").not());

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("Account,Section,Label,Amount"));
    assert!(csv.contains("3000.00"));
}

#[test]
fn backup_and_snapshot_round_trip() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("ledger.json");
    moneyflow(&dir).args(["account", "create", "Wallet"]).assert().success();

    moneyflow(&dir)
        .args(["backup", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup created: backup-"));
    moneyflow(&dir)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("backup-"));

    moneyflow(&dir)
        .args(["backup", "export"])
        .arg(&snapshot)
        .assert()
        .success();

    let other = TempDir::new().unwrap();
    moneyflow(&other)
        .args(["backup", "import", "--force"])
        .arg(&snapshot)
        .assert()
        .success();
    moneyflow(&other)
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wallet"));
}

#[test]
fn malformed_import_is_rejected() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, r#"{"transactions": []}"#).unwrap();

    moneyflow(&dir)
        .args(["backup", "import", "--force"])
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed document"));
}
