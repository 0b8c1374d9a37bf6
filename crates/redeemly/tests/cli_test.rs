//! Integration tests for the `redeemly` CLI binary.
//!
//! Every test runs against a fresh temp directory holding the config file
//! and the ledger, with stdin piped (never a terminal).
#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn ledger(&self) -> PathBuf {
        self.dir.path().join("data.xlsx")
    }

    fn config(&self) -> PathBuf {
        self.dir.path().join("config").join("config.toml")
    }

    /// `redeemly` with env isolation, bound to this sandbox's ledger.
    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = self.bare_cmd();
        cmd.arg("--ledger").arg(self.ledger());
        cmd
    }

    /// `redeemly` with env isolation and no `--ledger` flag.
    fn bare_cmd(&self) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("redeemly");
        cmd.env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join("xdg-config"))
            .env("XDG_DATA_HOME", self.dir.path().join("xdg-data"))
            .env("REDEEMLY_CONFIG", self.config())
            .env("NO_COLOR", "1")
            .env_remove("REDEEMLY_LEDGER")
            .env_remove("REDEEMLY_OUTPUT")
            .env_remove("REDEEMLY_DEFAULTS_LIMIT")
            .env_remove("REDEEMLY_DEFAULTS_RECENT")
            .env_remove("REDEEMLY_DEFAULTS_ORDER")
            .env_remove("RUST_LOG");
        cmd
    }

    fn register(&self, barcode: &str, limit: u32) {
        self.cmd()
            .args(["register", barcode, "--limit", &limit.to_string()])
            .assert()
            .success();
    }
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let sandbox = Sandbox::new();
    let output = sandbox.bare_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    Sandbox::new()
        .bare_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("register")
                .and(predicate::str::contains("search"))
                .and(predicate::str::contains("recent"))
                .and(predicate::str::contains("ledger")),
        );
}

#[test]
fn test_completions_zsh() {
    Sandbox::new()
        .bare_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_output_format() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .cmd()
        .args(["--output", "invalid", "recent"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about output format:\n{text}"
    );
}

// ── Registration ────────────────────────────────────────────────────

#[test]
fn test_register_writes_first_row() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["--output", "plain", "register", "123", "--limit", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("123\t").and(predicate::str::contains(
            "\t1 회\t신규 등록\t5회",
        )))
        .stderr(predicate::str::contains("New registration"));

    assert!(sandbox.ledger().is_file());
}

#[test]
fn test_register_walks_to_the_limit_then_refuses() {
    let sandbox = Sandbox::new();
    sandbox.register("42", 2);

    sandbox
        .cmd()
        .args(["--output", "plain", "register", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\t2 회\t사용 완료\t2회"));

    sandbox
        .cmd()
        .args(["register", "42", "--no-history"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("redemption limit of 2"));
}

#[test]
fn test_new_barcode_without_limit_needs_one_off_terminal() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["register", "777"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("has no redemption limit"));
}

#[test]
fn test_configured_default_limit_applies() {
    let sandbox = Sandbox::new();
    sandbox
        .bare_cmd()
        .args(["config", "set-limit", "3"])
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["--output", "plain", "register", "abc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\t1 회\t신규 등록\t3회"));
}

#[test]
fn test_register_json_includes_history_and_recent() {
    let sandbox = Sandbox::new();
    sandbox.register("a", 5);

    let output = sandbox
        .cmd()
        .args(["--output", "json", "register", "a"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["registration"]["status"], "accepted");
    assert_eq!(json["registration"]["remark"], "REUSED");
    assert_eq!(json["history"]["records"].as_array().unwrap().len(), 2);
    assert_eq!(json["recent"]["scroll_to_newest"], true);
}

#[test]
fn test_empty_barcode_is_a_usage_error() {
    Sandbox::new()
        .cmd()
        .args(["register", "  ", "--limit", "5"])
        .assert()
        .code(2);
}

#[test]
fn test_out_of_range_limit_is_a_usage_error() {
    Sandbox::new()
        .cmd()
        .args(["register", "x", "--limit", "1001"])
        .assert()
        .code(2);
}

// ── Scan loop ───────────────────────────────────────────────────────

#[test]
fn test_scan_reads_barcodes_until_q() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["--output", "plain", "scan", "--limit", "2"])
        .write_stdin("a\n\nb\na\na\nq\nc\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("3 accepted, 1 refused, 0 skipped"));

    sandbox
        .cmd()
        .args(["--output", "plain", "search", "c"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

// ── Search / recent ─────────────────────────────────────────────────

#[test]
fn test_search_lists_rows_in_order() {
    let sandbox = Sandbox::new();
    sandbox.register("s", 3);
    sandbox.register("other", 3);
    sandbox.register("s", 3);

    let output = sandbox
        .cmd()
        .args(["--output", "plain", "search", "s"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("\t1 회\t신규 등록"));
    assert!(lines[1].contains("\t2 회\t중복 사용"));
}

#[test]
fn test_search_table_shows_remaining() {
    let sandbox = Sandbox::new();
    sandbox.register("t", 4);

    sandbox
        .cmd()
        .args(["search", "t"])
        .assert()
        .success()
        .stdout(predicate::str::contains("limit 4, 3 remaining"));
}

#[test]
fn test_recent_count_and_order() {
    let sandbox = Sandbox::new();
    for code in ["1", "2", "3"] {
        sandbox.register(code, 5);
    }

    let output = sandbox
        .cmd()
        .args([
            "--output",
            "plain",
            "recent",
            "--count",
            "2",
            "--order",
            "newest-first",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let barcodes: Vec<&str> = stdout
        .lines()
        .filter_map(|l| l.split('\t').next())
        .collect();
    assert_eq!(barcodes, vec!["3", "2"]);
}

// ── Delete ──────────────────────────────────────────────────────────

fn first_date(sandbox: &Sandbox, barcode: &str) -> String {
    let output = sandbox
        .cmd()
        .args(["--output", "plain", "search", barcode])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .next()
        .and_then(|l| l.split('\t').nth(1))
        .unwrap()
        .to_owned()
}

#[test]
fn test_delete_requires_yes_without_terminal() {
    let sandbox = Sandbox::new();
    sandbox.register("d", 5);
    let date = first_date(&sandbox, "d");

    sandbox
        .cmd()
        .args(["delete", "d", "--date", &date, "--sequence", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn test_delete_with_yes_frees_a_use() {
    let sandbox = Sandbox::new();
    sandbox.register("single", 1);
    sandbox
        .cmd()
        .args(["register", "single"])
        .assert()
        .code(6);

    let date = first_date(&sandbox, "single");
    sandbox
        .cmd()
        .args(["--yes", "delete", "single", "--date", &date, "--sequence", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));

    sandbox.register("single", 1);
}

#[test]
fn test_delete_unknown_entry_is_not_found() {
    let sandbox = Sandbox::new();
    sandbox.register("n", 5);

    sandbox
        .cmd()
        .args([
            "--yes",
            "delete",
            "n",
            "--date",
            "1999-01-01 00:00",
            "--sequence",
            "1",
        ])
        .assert()
        .code(4);
}

// ── Ledger & config ─────────────────────────────────────────────────

#[test]
fn test_ledger_init_and_info() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["ledger", "init"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Created"));

    sandbox.register("i", 1);

    let output = sandbox
        .cmd()
        .args(["--output", "json", "ledger", "info"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["rows"], 1);
    assert_eq!(json["barcodes"], 1);
    assert_eq!(json["exhausted"], 1);
}

#[test]
fn test_ledger_save_as_becomes_the_configured_ledger() {
    let sandbox = Sandbox::new();
    sandbox.register("keep", 5);
    let copy = sandbox.dir.path().join("backup").join("copy.xlsx");

    sandbox
        .cmd()
        .args(["ledger", "save-as"])
        .arg(&copy)
        .assert()
        .success();
    assert!(copy.is_file());

    // No --ledger: the saved config now points at the copy.
    sandbox
        .bare_cmd()
        .args(["--output", "plain", "search", "keep"])
        .assert()
        .success()
        .stdout(predicate::str::contains("keep\t"));
}

#[test]
fn test_unusable_ledger_path_is_a_storage_error() {
    let sandbox = Sandbox::new();
    let blocker = sandbox.dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    sandbox
        .bare_cmd()
        .arg("--ledger")
        .arg(blocker.join("data.xlsx"))
        .arg("recent")
        .assert()
        .code(7)
        .stderr(predicate::str::contains("cannot be used"));
}

#[test]
fn test_ledger_open_switches_away_from_an_unusable_ledger() {
    let sandbox = Sandbox::new();
    let blocker = sandbox.dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    sandbox
        .bare_cmd()
        .args(["config", "set-ledger"])
        .arg(blocker.join("data.xlsx"))
        .assert()
        .success();

    let good = sandbox.dir.path().join("good.xlsx");
    sandbox
        .bare_cmd()
        .args(["ledger", "open"])
        .arg(&good)
        .assert()
        .success()
        .stderr(predicate::str::contains("Active ledger"));
    assert!(good.is_file());

    sandbox
        .bare_cmd()
        .args(["register", "g", "--limit", "2"])
        .assert()
        .success();
    assert!(!sandbox.dir.path().join("xdg-data").exists());
}

#[test]
fn test_config_path_and_show() {
    let sandbox = Sandbox::new();
    sandbox
        .bare_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));

    sandbox
        .bare_cmd()
        .args(["config", "set-limit", "7"])
        .assert()
        .success();
    sandbox
        .bare_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("limit = 7"));

    sandbox
        .bare_cmd()
        .args(["config", "set-limit", "--clear"])
        .assert()
        .success();
    sandbox
        .bare_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("limit =").not());
}

#[test]
fn test_config_set_limit_rejects_out_of_range() {
    Sandbox::new()
        .bare_cmd()
        .args(["config", "set-limit", "0"])
        .assert()
        .code(2);
}
