//! CLI entry point for spendguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `spendguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use spendguard_app::{
    CompileInput, EvaluateInput, ExplainOutput, SimulateInput, decision_exit_code,
    parse_report_json, render_evaluation_markdown, render_report_markdown, render_trace,
    run_compile, run_evaluate, run_explain, run_simulate, serialize_report,
};
use spendguard_settings::Overrides;
use spendguard_types::{Money, Transaction};
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG: &str = "spendguard.toml";

#[derive(Parser, Debug)]
#[command(
    name = "spendguard",
    version,
    about = "Compile free-text spending policies and evaluate transactions against them"
)]
struct Cli {
    /// Path to spendguard config TOML (default: spendguard.toml, missing file allowed).
    #[arg(long, global = true)]
    config: Option<Utf8PathBuf>,

    /// Policy text; overrides `policy` from the config file.
    #[arg(long, global = true)]
    policy: Option<String>,

    /// Debug logging to stderr (RUST_LOG still wins when set).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile the policy and print it as JSON.
    Compile {
        /// Write the JSON here instead of stdout.
        #[arg(long)]
        out: Option<Utf8PathBuf>,

        /// Emit the full policy document (matched extractors, fingerprint, summary).
        #[arg(long)]
        trace: bool,
    },

    /// Evaluate one transaction against the policy.
    Evaluate {
        /// Transaction amount, e.g. 45 or 12.50.
        #[arg(long, allow_hyphen_values = true)]
        amount: Money,

        /// Merchant or destination name.
        #[arg(long)]
        destination: String,

        /// Currency or asset symbol (informational).
        #[arg(long, default_value = "")]
        token: String,

        #[arg(long, default_value = "")]
        purpose: String,

        /// Approved spend so far; overrides `[budget] spent_in_window`.
        #[arg(long, allow_hyphen_values = true)]
        spent: Option<Money>,

        /// Write the updated budget state as JSON.
        #[arg(long)]
        budget_out: Option<Utf8PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Run a batch of transactions and write a report.
    Simulate {
        /// JSON array of transactions. Synthetic transactions are generated when omitted.
        #[arg(long)]
        transactions: Option<Utf8PathBuf>,

        /// Override `[simulation] seed`.
        #[arg(long)]
        seed: Option<u64>,

        /// Override `[simulation] count`.
        #[arg(long)]
        count: Option<u32>,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/spendguard/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/spendguard/report.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/spendguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Explain a rule id or code with remediation guidance.
    Explain {
        /// The rule id (e.g., "spend.per_tx_limit") or code (e.g., "approval_required").
        identifier: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
    Markdown,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("spendguard error: {err:#}");
            1
        }
    };
    std::process::exit(code);
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.cmd {
        Commands::Compile { out, trace } => cmd_compile(cli, out.as_deref(), *trace),
        Commands::Evaluate {
            amount,
            destination,
            token,
            purpose,
            spent,
            budget_out,
            format,
        } => {
            let tx = Transaction::new(*amount, destination.clone())
                .with_token(token.clone())
                .with_purpose(purpose.clone());
            cmd_evaluate(cli, tx, *spent, budget_out.as_deref(), *format)
        }
        Commands::Simulate {
            transactions,
            seed,
            count,
            report_out,
            write_markdown,
            markdown_out,
        } => {
            let mut overrides = overrides(cli);
            overrides.seed = *seed;
            overrides.count = *count;
            cmd_simulate(
                cli,
                overrides,
                transactions.as_deref(),
                report_out,
                write_markdown.then_some(markdown_out.as_path()),
            )
        }
        Commands::Md { report, output } => cmd_md(report, output.as_deref()),
        Commands::Explain { identifier } => Ok(cmd_explain(identifier)),
    }
}

fn overrides(cli: &Cli) -> Overrides {
    Overrides {
        policy: cli.policy.clone(),
        ..Overrides::default()
    }
}

/// Load config if present; a missing file means defaults.
fn read_config(cli: &Cli) -> anyhow::Result<String> {
    let (path, explicit) = match &cli.config {
        Some(p) => (p.clone(), true),
        None => (Utf8PathBuf::from(DEFAULT_CONFIG), false),
    };
    if !path.exists() {
        if explicit {
            warn!(path = %path, "config file not found; using defaults");
        } else {
            debug!(path = %path, "no config file; using defaults");
        }
        return Ok(String::new());
    }
    std::fs::read_to_string(&path).with_context(|| format!("read config: {}", path))
}

fn cmd_compile(cli: &Cli, out: Option<&Utf8Path>, trace: bool) -> anyhow::Result<i32> {
    let config_text = read_config(cli)?;
    let output = run_compile(CompileInput {
        config_text: &config_text,
        overrides: overrides(cli),
    })?;

    let json = if trace {
        serde_json::to_string_pretty(&output.document)
    } else {
        serde_json::to_string_pretty(&output.document.policy)
    }
    .context("serialize policy")?;

    match out {
        Some(path) => write_text_file(path, &format!("{json}\n")).context("write policy json")?,
        None => println!("{json}"),
    }
    Ok(0)
}

fn cmd_evaluate(
    cli: &Cli,
    tx: Transaction,
    spent: Option<Money>,
    budget_out: Option<&Utf8Path>,
    format: OutputFormat,
) -> anyhow::Result<i32> {
    let config_text = read_config(cli)?;
    let mut overrides = overrides(cli);
    overrides.spent_in_window = spent;

    let output = run_evaluate(EvaluateInput {
        config_text: &config_text,
        overrides,
        transaction: tx,
    })?;
    let doc = &output.document;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(doc).context("serialize evaluation")?;
            println!("{json}");
        }
        OutputFormat::Text => {
            println!("{}: {}", doc.receipt.status.as_str(), doc.receipt.reason);
            for line in render_trace(&doc.receipt) {
                println!("  {line}");
            }
        }
        OutputFormat::Markdown => print!("{}", render_evaluation_markdown(doc, &output.policy)),
    }

    if let Some(path) = budget_out {
        let json = serde_json::to_string_pretty(&doc.budget).context("serialize budget")?;
        write_text_file(path, &format!("{json}\n")).context("write budget json")?;
    }

    Ok(decision_exit_code(doc.receipt.status))
}

fn cmd_simulate(
    cli: &Cli,
    overrides: Overrides,
    transactions: Option<&Utf8Path>,
    report_out: &Utf8Path,
    markdown_out: Option<&Utf8Path>,
) -> anyhow::Result<i32> {
    let config_text = read_config(cli)?;
    let transactions = transactions.map(read_transactions).transpose()?;

    let output = run_simulate(SimulateInput {
        config_text: &config_text,
        overrides,
        transactions,
    })?;

    let data = serialize_report(&output.report)?;
    write_bytes_file(report_out, &data).context("write report json")?;

    if let Some(path) = markdown_out {
        let md = render_report_markdown(&output.report);
        write_text_file(path, &md).context("write markdown")?;
    }

    let s = &output.report.summary;
    println!(
        "spendguard: {} transactions: {} approved, {} rejected, {} approval required (approved spend {})",
        s.total, s.approved, s.rejected, s.approval_required, s.approved_spend
    );
    Ok(0)
}

fn read_transactions(path: &Utf8Path) -> anyhow::Result<Vec<Transaction>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read transactions: {}", path))?;
    serde_json::from_str(&text).with_context(|| format!("parse transactions: {}", path))
}

fn write_bytes_file(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, data).with_context(|| format!("write file: {}", path))?;
    Ok(())
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes_file(path, text.as_bytes())
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<i32> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    let md = render_report_markdown(&report);

    match output {
        Some(out_path) => write_text_file(out_path, &md).context("write markdown output")?,
        None => print!("{}", md),
    }
    Ok(0)
}

fn cmd_explain(identifier: &str) -> i32 {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", spendguard_app::format_explanation(&exp));
            0
        }
        ExplainOutput::NotFound {
            identifier,
            available_rule_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                spendguard_app::format_not_found(&identifier, available_rule_ids, available_codes)
            );
            1
        }
    }
}
