//! Use case orchestration for spendguard.
//!
//! This crate provides the application layer: use cases that coordinate the settings, domain,
//! and render layers. It is intentionally thin and delegates heavy lifting to those layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod compile;
mod config;
mod evaluate;
mod explain;
mod render;
mod report;
mod simulate;

pub use compile::{CompileInput, CompileOutput, PolicyDocument, SCHEMA_POLICY_V1, run_compile};
pub use evaluate::{EvaluateInput, EvaluateOutput, EvaluationDocument, run_evaluate};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use render::{render_evaluation_markdown, render_report_markdown, render_trace};
pub use report::{SpendguardReport, parse_report_json, serialize_report, to_renderable};
pub use simulate::{SimulateInput, SimulateOutput, run_simulate, synthetic_transactions};

use spendguard_types::DecisionStatus;

/// Process exit code for a single decision: approved 0, rejected 2, approval required 3.
pub fn decision_exit_code(status: DecisionStatus) -> i32 {
    match status {
        DecisionStatus::Approved => 0,
        DecisionStatus::Rejected => 2,
        DecisionStatus::ApprovalRequired => 3,
    }
}
