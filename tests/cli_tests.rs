mod common;

use assert_cmd::Command;
use common::{temp_dir, write_file, MARCH_STATEMENT};
use predicates::str::contains;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("spendlog_cli").unwrap();
    cmd.env("SPENDLOG_HOME", temp_dir()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn report_prints_sections() {
    let statement = write_file("march.txt", &MARCH_STATEMENT);
    cli()
        .args(["--no-color", "report", "--statement"])
        .arg(&statement)
        .args(["--from", "2025-03-01", "--to", "2025-03-31"])
        .assert()
        .success()
        .stdout(contains("Summary of economy between 2025-03-01 00:00:00 and 2025-03-31 23:59:59"))
        .stdout(contains("Counter Parties:"))
        .stdout(contains("  Ica:\n    liquidity: -350"))
        .stdout(contains("  net change: 24550"));
}

#[test]
fn report_as_json() {
    let statement = write_file("march.txt", &MARCH_STATEMENT);
    let output = cli()
        .args(["report", "--json", "--all", "--statement"])
        .arg(&statement)
        .args(["--from", "2025-03-24", "--to", "2025-03-24"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["totals"]["liquidity_change"], -350);
    assert_eq!(json["transactions"].as_array().unwrap().len(), 2);
}

#[test]
fn init_config_then_list_aliases() {
    let path = temp_dir().join("config.json");
    cli()
        .arg("init-config")
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("Wrote template config"));

    cli()
        .args(["aliases", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("ICA SUPERMARKET -> Ica [groceries]"));
}

#[test]
fn reversed_range_fails() {
    let statement = write_file("march.txt", &MARCH_STATEMENT);
    cli()
        .args(["report", "--statement"])
        .arg(&statement)
        .args(["--from", "2025-03-31", "--to", "2025-03-01"])
        .assert()
        .failure()
        .stderr(contains("Error:"));
}

#[test]
fn version_includes_build_metadata() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}
