// End-to-end tests for the `lsync` binary.
//
// Each test builds a throwaway ledger + config in a temp dir and drives the
// binary the way a cron job would: exit codes and stdout JSON are the contract.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn lsync() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lsync"));
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("LSYNC_LEDGER");
    cmd
}

fn run(args: &[&str]) -> Output {
    lsync().args(args).output().expect("run lsync")
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn stdout_json(out: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&out.stdout);
    serde_json::from_str(stdout.trim())
        .unwrap_or_else(|e| panic!("stdout must be one JSON value: {e}\nstdout:\n{stdout}"))
}

fn p(path: &Path) -> &str {
    path.to_str().unwrap()
}

/// Ledger with two customers and three priced items.
fn setup_ledger(dir: &Path) -> PathBuf {
    let ledger = dir.join("ledger.json");
    assert!(run(&["ledger", "init", p(&ledger)]).status.success());
    for name in ["Musharaf Ahmed", "Shazeb Khan"] {
        let out = run(&["ledger", "add-customer", p(&ledger), name]);
        assert!(out.status.success(), "{}", stderr(&out));
    }
    for (name, price) in [("Laptop", "999.00"), ("Mouse", "25"), ("Keyboard", "40.00")] {
        let out = run(&["ledger", "add-item", p(&ledger), name, "--price", price]);
        assert!(out.status.success(), "{}", stderr(&out));
    }
    ledger
}

const INVOICES: &str = "\
invoice_number,customer,date,memo,amount,item,quantity
INV-1,Musharaf Ahmed,2025-04-01,PNW,999.00,Laptop,1
INV-2,Shazeb Khan,2025-04-01,PNW,1049.00,Laptop,1
INV-2,Shazeb Khan,2025-04-01,PNW,1049.00,Mouse,2
";

fn write_config(dir: &Path, csv: &str) -> PathBuf {
    std::fs::write(dir.join("invoices.csv"), csv).unwrap();
    let config = dir.join("sync.toml");
    std::fs::write(
        &config,
        "name = \"test sync\"\n\n[ledger]\npath = \"ledger.json\"\n\n[local]\nfile = \"invoices.csv\"\n",
    )
    .unwrap();
    config
}

fn status_of<'a>(result: &'a serde_json::Value, key: &str) -> &'a str {
    result["records"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["key"] == key)
        .and_then(|r| r["status"].as_str())
        .unwrap_or_else(|| panic!("no record {key}"))
}

#[test]
fn first_run_creates_second_run_is_clean() {
    let dir = tempfile::tempdir().unwrap();
    setup_ledger(dir.path());
    let config = write_config(dir.path(), INVOICES);

    let out = run(&["reconcile", p(&config), "--json"]);
    assert!(out.status.success(), "{}", stderr(&out));
    let first = stdout_json(&out);
    assert_eq!(first["meta"]["name"], "test sync");
    assert_eq!(first["summary"]["added"], 2);
    assert_eq!(first["summary"]["created"], 2);
    assert_eq!(status_of(&first, "INV-1"), "added");
    assert!(first["records"][0]["external_id"].is_string());

    let out = run(&["reconcile", p(&config), "--json", "--fail-on-drift"]);
    assert!(out.status.success(), "{}", stderr(&out));
    let second = stdout_json(&out);
    assert_eq!(second["summary"]["unchanged"], 2);
    assert_eq!(second["summary"]["created"], 0);
}

#[test]
fn log_lines_go_to_stderr() {
    let dir = tempfile::tempdir().unwrap();
    setup_ledger(dir.path());
    let config = write_config(dir.path(), INVOICES);

    let out = run(&["reconcile", p(&config), "--json"]);
    let err = stderr(&out);
    assert!(err.contains("InvoiceReconciler Initialized."), "{err}");
    assert!(err.contains("Invoice INV-2 is Added."), "{err}");
    assert!(err.contains("InvoiceReconciler Completed"), "{err}");
    // stdout parses as a single JSON value, so nothing leaked there.
    stdout_json(&out);
}

#[test]
fn drift_fails_only_when_asked() {
    let dir = tempfile::tempdir().unwrap();
    setup_ledger(dir.path());
    let config = write_config(dir.path(), INVOICES);
    assert!(run(&["reconcile", p(&config)]).status.success());

    // INV-1 disappears locally, INV-2 changes memo.
    write_config(
        dir.path(),
        "invoice_number,customer,date,memo,amount,item,quantity\n\
         INV-2,Shazeb Khan,2025-04-01,Rush,1049.00,Laptop,1\n",
    );

    let out = run(&["reconcile", p(&config), "--json"]);
    assert!(out.status.success(), "{}", stderr(&out));
    let result = stdout_json(&out);
    assert_eq!(status_of(&result, "INV-1"), "missing");
    assert_eq!(status_of(&result, "INV-2"), "different");

    let out = run(&["reconcile", p(&config), "--fail-on-drift"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("1 different, 1 missing"));
}

#[test]
fn rejected_creation_exits_4_and_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    setup_ledger(dir.path());
    let config = write_config(
        dir.path(),
        "invoice_number,customer,date,item,quantity\n\
         INV-9,Nobody,2025-04-01,Laptop,1\n\
         INV-1,Musharaf Ahmed,2025-04-01,Laptop,1\n",
    );

    let out = run(&["reconcile", p(&config), "--json"]);
    assert_eq!(out.status.code(), Some(4), "{}", stderr(&out));
    let result = stdout_json(&out);
    assert_eq!(status_of(&result, "INV-9"), "failed");
    assert_eq!(status_of(&result, "INV-1"), "added");
    assert!(stderr(&out).contains("Invoice INV-9 could not be created: customer 'Nobody' not found"));
}

#[test]
fn keep_added_policy_still_exits_4_on_rejected_creation() {
    let dir = tempfile::tempdir().unwrap();
    setup_ledger(dir.path());
    let config = write_config(
        dir.path(),
        "invoice_number,customer,date,item,quantity\n\
         INV-9,Nobody,2025-04-01,Laptop,1\n",
    );
    std::fs::write(
        &config,
        "[policy]\non_create_failure = \"keep_added\"\n\n\
         [ledger]\npath = \"ledger.json\"\n\n[local]\nfile = \"invoices.csv\"\n",
    )
    .unwrap();

    let out = run(&["reconcile", p(&config), "--json"]);
    assert_eq!(out.status.code(), Some(4), "{}", stderr(&out));
    let result = stdout_json(&out);
    assert_eq!(status_of(&result, "INV-9"), "added");
    assert_eq!(result["summary"]["failed"], 0);
    assert_eq!(result["summary"]["create_failures"], 1);
}

#[test]
fn output_file_gets_the_json_result() {
    let dir = tempfile::tempdir().unwrap();
    setup_ledger(dir.path());
    let config = write_config(dir.path(), INVOICES);
    let result_path = dir.path().join("result.json");

    let out = run(&["reconcile", p(&config), "--output", p(&result_path)]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(out.stdout.is_empty());
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&result_path).unwrap()).unwrap();
    assert_eq!(written["summary"]["total"], 2);
}

#[test]
fn missing_ledger_exits_3_with_hint() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), INVOICES);

    let out = run(&["reconcile", p(&config)]);
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("lsync ledger init"));
}

#[test]
fn bad_input_exits_5() {
    let dir = tempfile::tempdir().unwrap();
    setup_ledger(dir.path());
    let config = write_config(
        dir.path(),
        "invoice_number,customer,date\nINV-1,Musharaf Ahmed,April first\n",
    );

    let out = run(&["reconcile", p(&config)]);
    assert_eq!(out.status.code(), Some(5));
    assert!(stderr(&out).contains("April first"));
}

#[test]
fn invalid_config_exits_6() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("sync.toml");
    std::fs::write(
        &config,
        "[ledger]\npath = \"ledger.json\"\n[local]\nfile = \"invoices.xlsx\"\n",
    )
    .unwrap();

    assert_eq!(run(&["validate", p(&config)]).status.code(), Some(6));
    assert_eq!(run(&["reconcile", p(&config)]).status.code(), Some(6));
}

#[test]
fn validate_accepts_good_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), INVOICES);
    let out = run(&["validate", p(&config)]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(stderr(&out).contains("ok (test sync"));
}

#[test]
fn add_then_query() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = setup_ledger(dir.path());

    let out = run(&[
        "add", "--ledger", p(&ledger),
        "--customer", "Shazeb Khan",
        "--date", "2025-04-01",
        "--number", "INV-123457",
        "--memo", "PNW",
        "--item", "Laptop:1",
        "--item", "Mouse:2",
        "--item", "Keyboard",
    ]);
    assert!(out.status.success(), "{}", stderr(&out));
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.starts_with("Invoice INV-123457 created with id "), "{text}");

    let out = run(&["query", "--ledger", p(&ledger)]);
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("Invoice Number: INV-123457"));
    assert!(text.contains("Total Amount: $1089.00"));
    assert!(text.contains("  - Mouse | Quantity: 2 | Price: $25.00 | Total: $50.00"));

    let out = run(&["query", "--ledger", p(&ledger), "--json"]);
    let invoices = stdout_json(&out);
    assert_eq!(invoices.as_array().unwrap().len(), 1);
    assert_eq!(invoices[0]["subtotal_minor"], 108900);
}

#[test]
fn add_duplicate_number_exits_4() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = setup_ledger(dir.path());
    let args = [
        "add", "--ledger", p(&ledger),
        "--customer", "Musharaf Ahmed",
        "--number", "INV-1",
        "--item", "Laptop:1",
    ];
    assert!(run(&args).status.success());

    let out = run(&args);
    assert_eq!(out.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&out.stdout).contains("invoice number 'INV-1' already exists"));
}

#[test]
fn add_bad_item_spec_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = setup_ledger(dir.path());
    let out = run(&[
        "add", "--ledger", p(&ledger),
        "--customer", "Musharaf Ahmed",
        "--number", "INV-1",
        "--item", "Laptop:lots",
    ]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("hint:"));
}

#[test]
fn ledger_admin_rejects_duplicates_and_reinit() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = setup_ledger(dir.path());

    assert_eq!(run(&["ledger", "init", p(&ledger)]).status.code(), Some(1));
    assert_eq!(
        run(&["ledger", "add-customer", p(&ledger), "Shazeb Khan"]).status.code(),
        Some(1)
    );
    assert_eq!(
        run(&["ledger", "add-item", p(&ledger), "Tablet", "--price", "1.234"]).status.code(),
        Some(2)
    );
}
