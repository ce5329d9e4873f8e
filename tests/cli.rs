use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const BIN_NAME: &str = "charity";

fn charity(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("CHARITY_LEDGER_DIR", home)
        .env_remove("CHARITY_LEDGER_FILE")
        .env_remove("RUST_LOG");
    cmd
}

fn sample_home() -> TempDir {
    let home = TempDir::new().unwrap();
    charity(home.path())
        .args(["init", "--sample"])
        .assert()
        .success()
        .stdout(contains("Added 7 sample transactions"));
    home
}

fn transaction_id(stdout: &[u8]) -> String {
    String::from_utf8_lossy(stdout)
        .lines()
        .find_map(|line| line.strip_prefix("Transaction: "))
        .map(|id| id.trim().to_string())
        .expect("details include the transaction id")
}

#[test]
fn init_creates_files_once() {
    let home = TempDir::new().unwrap();
    charity(home.path())
        .arg("init")
        .assert()
        .success()
        .stdout(contains("Created settings"));

    assert!(home.path().join("config.json").exists());
    assert!(home.path().join("data").join("ledger.json").exists());

    charity(home.path())
        .args(["init", "--sample"])
        .assert()
        .success()
        .stdout(contains("Ledger already exists"));
}

#[test]
fn report_for_mehr_1404() {
    let home = sample_home();
    charity(home.path())
        .args(["report", "--from", "1404/07/01", "--to", "1404/07/30"])
        .assert()
        .success()
        .stdout(contains("Financial Report: 1404/07/01 to 1404/07/30"))
        .stdout(contains("Total Income:    17,500,000 IRR"))
        .stdout(contains("Total Expense:   10,450,000 IRR"))
        .stdout(contains("Mehr 1404"))
        .stdout(contains("7,050,000"));
}

#[test]
fn report_with_opening_balance_and_override() {
    let home = sample_home();
    charity(home.path())
        .args([
            "report",
            "--from",
            "1404/07/01",
            "--to",
            "1404/07/30",
            "--opening",
            "1,000,000",
            "--expense-override",
            "10000000",
        ])
        .assert()
        .success()
        .stdout(contains("Closing Balance: 8,050,000 IRR"))
        .stdout(contains("manual; calculated 10,450,000"))
        .stdout(contains("8,500,000"));
}

#[test]
fn report_rejects_invalid_dates() {
    let home = sample_home();
    charity(home.path())
        .args(["report", "--from", "1300/13/01", "--to", "1404/07/30"])
        .assert()
        .failure()
        .stderr(contains("month 13 is not between 1 and 12"))
        .stdout(contains("Financial Report").not());

    charity(home.path())
        .args(["report", "--from", "1404/08/01", "--to", "1404/07/01"])
        .assert()
        .failure()
        .stderr(contains("is after end date"));
}

#[test]
fn report_prompt_and_analysis() {
    let home = sample_home();
    charity(home.path())
        .args(["report", "--from", "1404/07/01", "--to", "1404/07/30", "--prompt"])
        .assert()
        .success()
        .stdout(contains("Sample transactions (7 of 7):"))
        .stdout(contains("- Start date: 1 Mehr 1404"));

    charity(home.path())
        .args(["report", "--from", "1404/07/01", "--to", "1404/07/30", "--analyze"])
        .assert()
        .failure()
        .stderr(contains("narrative_command"));

    charity(home.path())
        .args(["report", "--from", "1404/07/01", "--to", "1404/07/30", "--prompt", "--language", "persian"])
        .assert()
        .success()
        .stdout(contains("به زبان فارسی"))
        .stdout(contains("- تاریخ شروع گزارش: 1 مهر 1404"));
}

#[cfg(unix)]
#[test]
fn report_analysis_runs_configured_command() {
    let home = sample_home();
    let config_path = home.path().join("config.json");
    let mut config: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config_path).unwrap()).unwrap();
    config["narrative_command"] = serde_json::json!(["sh", "-c", "wc -l >/dev/null; echo Finances are stable."]);
    fs::write(&config_path, config.to_string()).unwrap();

    charity(home.path())
        .args(["report", "--from", "1404/07/01", "--to", "1404/07/30", "--analyze"])
        .assert()
        .success()
        .stdout(contains("Finances are stable."));
}

#[test]
fn report_export_formats() {
    let home = sample_home();
    let csv_path = home.path().join("mehr.csv");
    let json_path = home.path().join("mehr.json");

    charity(home.path())
        .args(["report", "--from", "1404/07/01", "--to", "1404/07/30", "--output"])
        .arg(&csv_path)
        .assert()
        .success();
    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("Month,Label,Income,Expense,Running Balance\n"));
    assert!(csv.contains("1404/07,Mehr 1404,17500000,10450000,7050000"));

    charity(home.path())
        .args(["report", "--from", "1404/07/01", "--to", "1404/07/30", "--format", "json", "--output"])
        .arg(&json_path)
        .assert()
        .success();
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["report"]["total_income"], 17_500_000);
    assert_eq!(json["statement"]["closing_balance"], 7_050_000);
}

#[test]
fn transaction_add_list_delete() {
    let home = TempDir::new().unwrap();
    charity(home.path()).arg("init").assert().success();

    let output = charity(home.path())
        .args([
            "txn",
            "add",
            "bread",
            "750,000",
            "Daily bread",
            "--date",
            "1404/07/28",
            "--time",
            "16:30",
            "--source",
            "Baker",
        ])
        .assert()
        .success()
        .stdout(contains("1404/07/28 16:30"))
        .get_output()
        .stdout
        .clone();
    let id = transaction_id(&output);

    charity(home.path())
        .args(["transaction", "list", "--flow", "expense"])
        .assert()
        .success()
        .stdout(contains("Daily bread"))
        .stdout(contains("-750,000"))
        .stdout(contains("Showing 1 transactions"));

    charity(home.path())
        .args(["transaction", "list", "--from", "1404/08/01", "--to", "1404/08/30"])
        .assert()
        .success()
        .stdout(contains("No transactions found."));

    charity(home.path())
        .args(["transaction", "delete", &id])
        .assert()
        .success()
        .stdout(contains("Deleted transaction"));

    charity(home.path())
        .args(["transaction", "list"])
        .assert()
        .success()
        .stdout(contains("No transactions found."));

    charity(home.path())
        .args(["transaction", "delete", &id])
        .assert()
        .failure()
        .stderr(contains("Transaction not found"));
}

#[test]
fn transaction_add_rejects_bad_input() {
    let home = TempDir::new().unwrap();
    charity(home.path()).arg("init").assert().success();

    charity(home.path())
        .args(["txn", "add", "bread", "100", "Bread", "--flow", "income", "--date", "1404/07/01"])
        .assert()
        .failure()
        .stderr(contains("cannot be used for income transactions"));

    charity(home.path())
        .args(["txn", "add", "bread", "0", "Bread", "--date", "1404/07/01"])
        .assert()
        .failure()
        .stderr(contains("greater than zero"));

    charity(home.path())
        .args(["txn", "add", "bread", "100", "Bread", "--date", "1404/12/30"])
        .assert()
        .failure()
        .stderr(contains("does not exist"));

    charity(home.path())
        .args(["txn", "add", "bread", "4611686018427387904", "Bread", "--date", "1404/07/01"])
        .assert()
        .failure()
        .stderr(contains("Amount out of range"));

    charity(home.path())
        .args(["report", "--opening", "9223372036854775807"])
        .assert()
        .failure()
        .stderr(contains("Invalid --opening"));

    charity(home.path())
        .arg("summary")
        .assert()
        .success()
        .stdout(contains("Transactions:"))
        .stdout(contains("0 IRR"));
}

#[test]
fn export_then_import_into_new_ledger() {
    let home = sample_home();
    let csv_path = home.path().join("ledger.csv");
    let other_ledger = home.path().join("other.json");

    charity(home.path())
        .arg("export")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(contains("Exported 7 transactions"));

    charity(home.path())
        .arg("--ledger")
        .arg(&other_ledger)
        .arg("import")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(contains("Imported 7 transactions"));

    charity(home.path())
        .arg("--ledger")
        .arg(&other_ledger)
        .arg("summary")
        .assert()
        .success()
        .stdout(contains("17,500,000 IRR"))
        .stdout(contains("7,050,000 IRR"));

    // Same ids again: nothing is imported
    charity(home.path())
        .arg("--ledger")
        .arg(&other_ledger)
        .arg("import")
        .arg(&csv_path)
        .assert()
        .failure()
        .stderr(contains("line 2"));
}

#[test]
fn yaml_export_round_trip() {
    let home = sample_home();
    let yaml_path = home.path().join("ledger.yaml");
    let other_ledger = home.path().join("other.json");

    charity(home.path())
        .args(["export", "--format", "yaml"])
        .arg(&yaml_path)
        .assert()
        .success();
    assert!(fs::read_to_string(&yaml_path)
        .unwrap()
        .starts_with("# Charity Ledger Export"));

    charity(home.path())
        .arg("--ledger")
        .arg(&other_ledger)
        .args(["import", "--format", "yaml"])
        .arg(&yaml_path)
        .assert()
        .success()
        .stdout(contains("Imported 7 transactions"));
}

#[test]
fn date_conversion() {
    let home = TempDir::new().unwrap();

    charity(home.path())
        .args(["date", "to-gregorian", "1404/01/01"])
        .assert()
        .success()
        .stdout(contains("= 2025-03-21"));

    charity(home.path())
        .args(["date", "to-jalali", "2025-10-01"])
        .assert()
        .success()
        .stdout(contains("1404/07/09 (9 Mehr 1404)"));

    charity(home.path())
        .args(["date", "to-gregorian", "1404/12/30"])
        .assert()
        .failure()
        .stderr(contains("does not exist"));
}

#[test]
fn config_shows_paths_and_settings() {
    let home = TempDir::new().unwrap();
    charity(home.path())
        .arg("config")
        .assert()
        .success()
        .stdout(contains("UTC offset:          +03:30"))
        .stdout(contains("(not configured)"));
}
