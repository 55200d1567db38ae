//! Subcommand behavior: output shapes, exit codes, and config handling.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use spendguard_test_util::{entry_statuses, normalize_nondeterministic};
use tempfile::TempDir;

const POLICY: &str = "Max $50 per transaction, only OpenAI and Anthropic, approval above $40";

#[allow(deprecated)]
fn spendguard_cmd() -> Command {
    Command::cargo_bin("spendguard").expect("spendguard binary not found")
}

/// A command running in an empty temp dir, so no stray `spendguard.toml` is picked up.
fn isolated(temp: &TempDir) -> Command {
    let mut cmd = spendguard_cmd();
    cmd.current_dir(temp.path()).env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn evaluate(temp: &TempDir, amount: &str, destination: &str) -> std::process::Output {
    isolated(temp)
        .args(["--policy", POLICY, "evaluate", "--amount", amount])
        .args(["--destination", destination])
        .output()
        .expect("run evaluate")
}

#[test]
fn compile_prints_policy_model() {
    let temp = TempDir::new().unwrap();
    let output = isolated(&temp)
        .args(["--policy", POLICY, "compile"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let policy = stdout_json(&output);
    assert_eq!(policy["per_tx_limit"], "50");
    assert!(policy["total_limit"].is_null());
    assert_eq!(
        policy["allowed_merchants"],
        serde_json::json!(["anthropic", "openai"])
    );
    assert_eq!(policy["approval_threshold"], "40");
    assert_eq!(policy["require_purpose"], false);
}

#[test]
fn compile_trace_includes_matched_extractors_and_fingerprint() {
    let temp = TempDir::new().unwrap();
    let output = isolated(&temp)
        .args(["--policy", POLICY, "compile", "--trace"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let doc = stdout_json(&output);
    assert_eq!(doc["schema"], "spendguard.policy.v1");
    assert_eq!(
        doc["matched"],
        serde_json::json!(["per_tx_limit", "allow_list", "approval_threshold"])
    );
    assert_eq!(doc["policy_fingerprint"].as_str().map(str::len), Some(64));
}

#[test]
fn compile_without_policy_is_noop() {
    let temp = TempDir::new().unwrap();
    let output = isolated(&temp).arg("compile").output().unwrap();
    assert!(output.status.success());
    let policy = stdout_json(&output);
    assert!(policy["per_tx_limit"].is_null());
    assert_eq!(policy["blocked_categories"], serde_json::json!([]));
}

#[test]
fn compile_out_writes_file() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("nested").join("policy.json");
    isolated(&temp)
        .args(["--policy", "$100 total", "compile", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let policy: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(policy["total_limit"], "100");
}

#[test]
fn evaluate_exit_codes_follow_decision() {
    let temp = TempDir::new().unwrap();

    let approved = evaluate(&temp, "30", "OpenAI API");
    assert_eq!(approved.status.code(), Some(0));
    assert_eq!(stdout_json(&approved)["status"], "approved");

    let escalated = evaluate(&temp, "45", "Anthropic");
    assert_eq!(escalated.status.code(), Some(3));
    let doc = stdout_json(&escalated);
    assert_eq!(doc["status"], "approval_required");
    assert_eq!(doc["reason"], "amount 45 exceeds approval threshold 40");

    let rejected = evaluate(&temp, "60", "OpenAI API");
    assert_eq!(rejected.status.code(), Some(2));
    let doc = stdout_json(&rejected);
    assert_eq!(doc["status"], "rejected");
    assert_eq!(doc["failing_rule"], "spend.per_tx_limit");
}

#[test]
fn evaluate_document_carries_checks_and_budget() {
    let temp = TempDir::new().unwrap();
    let output = evaluate(&temp, "30", "OpenAI API");
    let doc = stdout_json(&output);

    assert_eq!(doc["schema"], "spendguard.evaluation.v1");
    assert_eq!(doc["transaction"]["destination"], "OpenAI API");
    assert_eq!(doc["budget"]["spent_in_window"], "30");

    let labels: Vec<&str> = doc["checks"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["rule"].as_str())
        .collect();
    assert_eq!(
        labels,
        vec![
            "spend.per_tx_limit",
            "spend.allowed_destinations",
            "spend.approval_threshold"
        ]
    );
}

#[test]
fn evaluate_spent_flag_feeds_total_limit() {
    let temp = TempDir::new().unwrap();
    let budget_out = temp.path().join("budget.json");

    isolated(&temp)
        .args(["--policy", "$100 total", "evaluate"])
        .args(["--amount", "40", "--destination", "AWS", "--spent", "60"])
        .arg("--budget-out")
        .arg(&budget_out)
        .assert()
        .code(0);

    let budget: Value =
        serde_json::from_str(&std::fs::read_to_string(&budget_out).unwrap()).unwrap();
    assert_eq!(budget["spent_in_window"], "100");

    isolated(&temp)
        .args(["--policy", "$100 total", "evaluate"])
        .args(["--amount", "0.01", "--destination", "AWS", "--spent", "100"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("spend.total_limit"));
}

#[test]
fn evaluate_text_format_prints_trace() {
    let temp = TempDir::new().unwrap();
    isolated(&temp)
        .args(["--policy", POLICY, "evaluate", "--format", "text"])
        .args(["--amount", "10", "--destination", "Google Cloud"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("rejected: Allowed destinations failed"))
        .stdout(predicate::str::contains("[FAIL]"));
}

#[test]
fn evaluate_markdown_format() {
    let temp = TempDir::new().unwrap();
    isolated(&temp)
        .args(["--policy", POLICY, "evaluate", "--format", "markdown"])
        .args(["--amount", "10", "--destination", "OpenAI"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("# Spendguard evaluation"))
        .stdout(predicate::str::contains("APPROVED"));
}

#[test]
fn negative_amount_is_an_error_not_a_rejection() {
    let temp = TempDir::new().unwrap();
    isolated(&temp)
        .args(["evaluate", "--amount", "-5", "--destination", "AWS"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("spendguard error:"))
        .stderr(predicate::str::contains("must not be negative"));
}

#[test]
fn malformed_amount_is_a_usage_error() {
    let temp = TempDir::new().unwrap();
    isolated(&temp)
        .args(["evaluate", "--amount", "ten", "--destination", "AWS"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid amount"));
}

#[test]
fn config_file_supplies_policy_and_overrides() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("spendguard.toml"),
        r#"schema = "spendguard.config.v1"
policy = "Max $50 per transaction"

[overrides]
blocked_categories = ["casino"]

[budget]
spent_in_window = "10"
"#,
    )
    .unwrap();

    let output = isolated(&temp).arg("compile").output().unwrap();
    assert!(output.status.success());
    let policy = stdout_json(&output);
    assert_eq!(policy["per_tx_limit"], "50");
    assert_eq!(policy["blocked_categories"], serde_json::json!(["casino"]));

    isolated(&temp)
        .args(["evaluate", "--amount", "5", "--destination", "Lucky Casino"])
        .assert()
        .code(2);

    let output = isolated(&temp)
        .args(["evaluate", "--amount", "5", "--destination", "AWS"])
        .output()
        .unwrap();
    assert_eq!(stdout_json(&output)["budget"]["spent_in_window"], "15");
}

#[test]
fn policy_flag_beats_config_policy() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("spendguard.toml"),
        "policy = \"Max $50 per transaction\"\n",
    )
    .unwrap();

    let output = isolated(&temp)
        .args(["--policy", "$100 total", "compile"])
        .output()
        .unwrap();
    let policy = stdout_json(&output);
    assert!(policy["per_tx_limit"].is_null());
    assert_eq!(policy["total_limit"], "100");
}

#[test]
fn unknown_config_schema_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("spendguard.toml"),
        "schema = \"spendguard.config.v9\"\n",
    )
    .unwrap();

    isolated(&temp)
        .arg("compile")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("spendguard error:"));
}

#[test]
fn explicit_missing_config_warns_and_uses_defaults() {
    let temp = TempDir::new().unwrap();
    isolated(&temp)
        .args(["--config", "does-not-exist.toml", "compile"])
        .assert()
        .success()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn simulate_synthetic_batch_is_deterministic_per_seed() {
    let temp = TempDir::new().unwrap();
    let run = |name: &str| -> Value {
        let path = temp.path().join(name);
        isolated(&temp)
            .args(["--policy", POLICY, "simulate", "--seed", "7", "--count", "12"])
            .arg("--report-out")
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::contains("12 transactions"));
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap()
    };

    let first = run("a.json");
    let second = run("b.json");
    assert_eq!(entry_statuses(&first).len(), 12);
    assert_eq!(
        normalize_nondeterministic(first),
        normalize_nondeterministic(second)
    );
}

#[test]
fn simulate_writes_markdown_and_md_renders_report() {
    let temp = TempDir::new().unwrap();
    let report = temp.path().join("out").join("report.json");
    let markdown = temp.path().join("out").join("report.md");

    isolated(&temp)
        .args(["--policy", POLICY, "simulate", "--count", "5"])
        .arg("--report-out")
        .arg(&report)
        .arg("--write-markdown")
        .arg("--markdown-out")
        .arg(&markdown)
        .assert()
        .success();

    let written = std::fs::read_to_string(&markdown).unwrap();
    assert!(written.contains("# Spendguard batch report"));

    isolated(&temp)
        .arg("md")
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Spendguard batch report"))
        .stdout(predicate::str::contains("## Transactions"));
}

#[test]
fn md_rejects_foreign_report() {
    let temp = TempDir::new().unwrap();
    let report = temp.path().join("report.json");
    std::fs::write(&report, r#"{"schema": "spendguard.report.v0"}"#).unwrap();

    isolated(&temp)
        .arg("md")
        .arg("--report")
        .arg(&report)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("spendguard error:"));
}

#[test]
fn explain_known_rule_and_code() {
    spendguard_cmd()
        .args(["explain", "spend.per_tx_limit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Per-Transaction Limit"))
        .stdout(predicate::str::contains("Remediation"));

    spendguard_cmd()
        .args(["explain", "approval_required"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Approval Required"));
}

#[test]
fn explain_unknown_lists_available_ids() {
    spendguard_cmd()
        .args(["explain", "spend.nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown rule id or code: spend.nope"))
        .stderr(predicate::str::contains("spend.total_limit"));
}
