//! Developer tasks (schema generation, fixture conformance).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use schemars::schema_for;
use spendguard_test_util::{entry_statuses, normalize_nondeterministic};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .or_else(|_| std::env::current_dir())
        .unwrap_or_else(|_| PathBuf::from("."));

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(manifest_dir)
    } else {
        manifest_dir
    }
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "spendguard.policy.v1.json",
            generate: || schema_for!(spendguard_app::PolicyDocument),
        },
        SchemaSpec {
            filename: "spendguard.evaluation.v1.json",
            generate: || schema_for!(spendguard_app::EvaluationDocument),
        },
        SchemaSpec {
            filename: "spendguard.report.v1.json",
            generate: || schema_for!(spendguard_app::SpendguardReport),
        },
        SchemaSpec {
            filename: "spendguard.config.v1.json",
            generate: || schema_for!(spendguard_settings::SpendguardConfigV1),
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Check that schemas/ matches what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {}", name);
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {}", name);
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Run the spendguard binary on tests/fixtures and validate reports");
    eprintln!("  explain-coverage  Validate all rule IDs and codes have explanations");
}

/// Run the built binary over every batch fixture.
///
/// Each report must validate against the generated report schema, produce the expected
/// statuses, and be identical across two runs once timestamps are normalized.
fn conform() -> anyhow::Result<()> {
    let report_schema = serde_json::to_value(schema_for!(spendguard_app::SpendguardReport))
        .context("Failed to serialize report schema")?;
    let compiled = jsonschema::draft202012::new(&report_schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile report schema: {}", e))?;
    println!("✓ spendguard.report.v1 schema compiles");

    let bin = project_root().join("target").join("debug").join("spendguard");
    #[cfg(target_os = "windows")]
    let bin = bin.with_extension("exe");

    if !bin.exists() {
        bail!(
            "spendguard binary not found at {}.\n\
            Run `cargo build -p spendguard-cli` first.",
            bin.display()
        );
    }

    let mut errors = Vec::new();
    let mut fixture_count = 0;

    for entry in fs::read_dir(fixtures_dir()).context("Failed to read tests/fixtures/")? {
        let fixture_dir = entry?.path();
        if !fixture_dir.join("transactions.json").exists() {
            continue;
        }
        let name = fixture_dir
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let first = run_fixture(&bin, &fixture_dir)
            .with_context(|| format!("fixture '{}'", name))?;
        let second = run_fixture(&bin, &fixture_dir)
            .with_context(|| format!("fixture '{}'", name))?;

        for err in compiled.iter_errors(&first) {
            errors.push(format!("fixture '{}': schema validation: {}", name, err));
        }

        let expected_path = fixture_dir.join("expected.statuses.json");
        if expected_path.exists() {
            let expected: Vec<String> = serde_json::from_str(&fs::read_to_string(&expected_path)?)
                .with_context(|| format!("Failed to parse {}", expected_path.display()))?;
            let actual = entry_statuses(&first);
            if actual != expected {
                errors.push(format!(
                    "fixture '{}': statuses {:?} != expected {:?}",
                    name, actual, expected
                ));
            }
        }

        if normalize_nondeterministic(first) != normalize_nondeterministic(second) {
            errors.push(format!("fixture '{}': report differs between runs", name));
        }

        fixture_count += 1;
        println!("  ✓ {} checked", name);
    }

    if fixture_count == 0 {
        bail!("No batch fixtures found in {}", fixtures_dir().display());
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {}", err);
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All {} fixtures pass conformance checks!", fixture_count);
    Ok(())
}

fn run_fixture(bin: &Path, fixture_dir: &Path) -> anyhow::Result<serde_json::Value> {
    let policy = fs::read_to_string(fixture_dir.join("policy.txt")).unwrap_or_default();
    let temp_dir = tempfile::tempdir().context("Failed to create temp dir")?;
    let report_out = temp_dir.path().join("report.json");

    let output = std::process::Command::new(bin)
        .current_dir(temp_dir.path())
        .arg("--policy")
        .arg(policy.trim())
        .arg("simulate")
        .arg("--transactions")
        .arg(fixture_dir.join("transactions.json"))
        .arg("--report-out")
        .arg(&report_out)
        .output()
        .context("Failed to run spendguard")?;

    if !output.status.success() {
        bail!(
            "spendguard exited with {:?}: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let text = fs::read_to_string(&report_out).context("no report output generated")?;
    serde_json::from_str(&text).context("Failed to parse report")
}

/// Validate that all rule IDs and codes have explanations.
fn explain_coverage() -> anyhow::Result<()> {
    let rule_ids = spendguard_types::explain::all_rule_ids();
    let codes = spendguard_types::explain::all_codes();

    let mut errors = Vec::new();
    for (kind, identifier) in rule_ids
        .iter()
        .map(|id| ("Rule ID", id))
        .chain(codes.iter().map(|code| ("Code", code)))
    {
        match spendguard_types::explain::lookup_explanation(identifier) {
            Some(exp) => {
                if exp.title.is_empty() {
                    errors.push(format!("{} '{}' has empty title", kind, identifier));
                }
                if exp.description.is_empty() {
                    errors.push(format!("{} '{}' has empty description", kind, identifier));
                }
                if exp.remediation.is_empty() {
                    errors.push(format!("{} '{}' has empty remediation", kind, identifier));
                }
            }
            None => errors.push(format!("{} '{}' has no explanation", kind, identifier)),
        }
    }

    if errors.is_empty() {
        println!("✓ {} rule IDs have explanations", rule_ids.len());
        println!("✓ {} codes have explanations", codes.len());
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!(
            "Explain coverage validation failed with {} errors",
            errors.len()
        )
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
