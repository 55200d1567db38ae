//! Stable DTOs and IDs used across the spendguard workspace.
//!
//! This crate is intentionally boring:
//! - exact decimal money
//! - stable rule IDs and codes
//! - check results, decisions, and the emitted receipts/reports
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod money;
pub mod receipt;
pub mod rule;

pub use explain::{ExamplePair, Explanation, all_codes, all_rule_ids, lookup_explanation};
pub use money::{Money, MoneyParseError};
pub use receipt::{
    BatchSummary, CheckResult, Decision, DecisionStatus, EvaluationReceipt, ReportEntry,
    ReportEnvelope, RunMeta, SCHEMA_EVALUATION_V1, SCHEMA_REPORT_V1, ToolMeta, Transaction,
};
pub use rule::RuleKind;
