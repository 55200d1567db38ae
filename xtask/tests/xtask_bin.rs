use std::process::Command;

fn xtask(arg: &str) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_xtask"))
        .arg(arg)
        .output()
        .expect("run xtask")
}

#[test]
fn xtask_help_runs() {
    let output = xtask("help");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("xtask commands"));
}

#[test]
fn print_schema_ids_lists_every_document() {
    let output = xtask("print-schema-ids");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for id in [
        "spendguard.policy.v1",
        "spendguard.evaluation.v1",
        "spendguard.report.v1",
        "spendguard.config.v1",
    ] {
        assert!(stdout.contains(id), "missing {id}");
    }
}

#[test]
fn explain_coverage_passes() {
    assert!(xtask("explain-coverage").status.success());
}

#[test]
fn unknown_command_fails() {
    let output = xtask("frobnicate");
    assert!(!output.status.success());
}
