use crate::{Money, RuleKind};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Stable schema identifiers for spendguard outputs.
pub const SCHEMA_EVALUATION_V1: &str = "spendguard.evaluation.v1";
pub const SCHEMA_REPORT_V1: &str = "spendguard.report.v1";

/// A candidate transaction submitted for evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Transaction {
    pub amount: Money,
    pub destination: String,
    /// Currency or asset symbol. Informational only.
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub purpose: String,
}

impl Transaction {
    pub fn new(amount: Money, destination: impl Into<String>) -> Self {
        Self {
            amount,
            destination: destination.into(),
            token: String::new(),
            purpose: String::new(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }
}

/// One rule evaluation. `detail` carries the concrete values compared; it is the audit trail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckResult {
    pub rule: RuleKind,
    pub label: String,
    pub passed: bool,
    pub detail: String,

    /// Set only on the approval-threshold entry when the amount breached the threshold.
    /// Escalation is not a failure, so `passed` stays `true`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub escalated: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl CheckResult {
    pub fn pass(rule: RuleKind, detail: impl Into<String>) -> Self {
        Self {
            rule,
            label: rule.label().to_string(),
            passed: true,
            detail: detail.into(),
            escalated: false,
        }
    }

    pub fn fail(rule: RuleKind, detail: impl Into<String>) -> Self {
        Self {
            passed: false,
            ..Self::pass(rule, detail)
        }
    }

    pub fn escalate(rule: RuleKind, detail: impl Into<String>) -> Self {
        Self {
            escalated: true,
            ..Self::pass(rule, detail)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Approved,
    Rejected,
    ApprovalRequired,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Approved => "approved",
            DecisionStatus::Rejected => "rejected",
            DecisionStatus::ApprovalRequired => "approval_required",
        }
    }
}

/// The evaluator's verdict for one transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Rejected { failing_rule: RuleKind },
    ApprovalRequired { threshold_amount: Money },
}

impl Decision {
    pub fn status(&self) -> DecisionStatus {
        match self {
            Decision::Approved => DecisionStatus::Approved,
            Decision::Rejected { .. } => DecisionStatus::Rejected,
            Decision::ApprovalRequired { .. } => DecisionStatus::ApprovalRequired,
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Decision::Approved)
    }

    pub fn requires_approval(&self) -> bool {
        matches!(self, Decision::ApprovalRequired { .. })
    }
}

/// Evaluator output as exposed to callers: `status`, `reason`, `checks`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EvaluationReceipt {
    pub status: DecisionStatus,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failing_rule: Option<RuleKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_amount: Option<Money>,
    pub checks: Vec<CheckResult>,
}

impl EvaluationReceipt {
    pub fn decision(&self) -> Option<Decision> {
        match self.status {
            DecisionStatus::Approved => Some(Decision::Approved),
            DecisionStatus::Rejected => self
                .failing_rule
                .map(|failing_rule| Decision::Rejected { failing_rule }),
            DecisionStatus::ApprovalRequired => self
                .threshold_amount
                .map(|threshold_amount| Decision::ApprovalRequired { threshold_amount }),
        }
    }
}

/// Aggregated decision counts for a batch run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BatchSummary {
    pub total: u32,
    pub approved: u32,
    pub rejected: u32,
    pub approval_required: u32,
    /// Sum of approved amounts in this run (the budget accrued by the batch).
    pub approved_spend: Money,
    /// rule_id -> number of transactions that rule rejected (first failing rule only).
    #[serde(default)]
    pub rejections_by_rule: BTreeMap<String, u32>,
}

impl BatchSummary {
    pub fn count(&self, status: DecisionStatus) -> u32 {
        match status {
            DecisionStatus::Approved => self.approved,
            DecisionStatus::Rejected => self.rejected,
            DecisionStatus::ApprovalRequired => self.approval_required,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunMeta {
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// One evaluated transaction in a batch report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEntry {
    pub index: u32,
    pub transaction: Transaction,
    #[serde(flatten)]
    pub receipt: EvaluationReceipt,
}

/// Batch report envelope.
///
/// Generic over the policy payload so this crate does not depend on the domain model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TPolicy = serde_json::Value> {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    pub run: RunMeta,
    pub policy: TPolicy,
    pub policy_fingerprint: String,
    pub summary: BatchSummary,
    pub entries: Vec<ReportEntry>,
}
