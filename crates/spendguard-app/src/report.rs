use anyhow::Context;
use spendguard_domain::{BatchOutcome, PolicyModel, policy_fingerprint};
use spendguard_render::{
    RenderableCheck, RenderableEvaluation, RenderableReport, RenderableStatus, RenderableSummary,
};
use spendguard_types::{
    DecisionStatus, EvaluationReceipt, ReportEntry, ReportEnvelope, RunMeta, SCHEMA_REPORT_V1,
    ToolMeta, Transaction,
};
use time::OffsetDateTime;

/// `spendguard.report.v1` with the compiled policy embedded.
pub type SpendguardReport = ReportEnvelope<PolicyModel>;

pub(crate) fn build_report(
    policy: &PolicyModel,
    outcome: &BatchOutcome,
    started_at: OffsetDateTime,
    finished_at: OffsetDateTime,
) -> SpendguardReport {
    let duration_ms = (finished_at - started_at).whole_milliseconds().max(0) as u64;

    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "spendguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        run: RunMeta {
            started_at,
            finished_at,
            duration_ms: Some(duration_ms),
        },
        policy: policy.clone(),
        policy_fingerprint: policy_fingerprint(policy),
        summary: outcome.summary.clone(),
        entries: outcome
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| ReportEntry {
                index: i as u32,
                transaction: e.transaction.clone(),
                receipt: e.evaluation.to_receipt(),
            })
            .collect(),
    }
}

pub fn parse_report_json(text: &str) -> anyhow::Result<SpendguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse spendguard v1 report")
}

pub fn serialize_report(report: &SpendguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &SpendguardReport) -> RenderableReport {
    let s = &report.summary;
    RenderableReport {
        policy_lines: report.policy.describe(),
        policy_fingerprint: report.policy_fingerprint.clone(),
        summary: RenderableSummary {
            total: s.total,
            approved: s.approved,
            rejected: s.rejected,
            approval_required: s.approval_required,
            approved_spend: s.approved_spend.to_string(),
            rejections_by_rule: s
                .rejections_by_rule
                .iter()
                .map(|(rule, count)| (rule.clone(), *count))
                .collect(),
        },
        entries: report
            .entries
            .iter()
            .map(|e| renderable_evaluation(Some(e.index), &e.transaction, &e.receipt))
            .collect(),
    }
}

pub(crate) fn renderable_evaluation(
    index: Option<u32>,
    tx: &Transaction,
    receipt: &EvaluationReceipt,
) -> RenderableEvaluation {
    RenderableEvaluation {
        index,
        amount: tx.amount.to_string(),
        token: tx.token.clone(),
        destination: tx.destination.clone(),
        purpose: tx.purpose.clone(),
        status: match receipt.status {
            DecisionStatus::Approved => RenderableStatus::Approved,
            DecisionStatus::Rejected => RenderableStatus::Rejected,
            DecisionStatus::ApprovalRequired => RenderableStatus::ApprovalRequired,
        },
        reason: receipt.reason.clone(),
        checks: receipt
            .checks
            .iter()
            .map(|c| RenderableCheck {
                label: c.label.clone(),
                passed: c.passed,
                escalated: c.escalated,
                detail: c.detail.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendguard_domain::{compile, run_batch};
    use spendguard_types::Money;

    fn sample_report() -> SpendguardReport {
        let policy = compile("$100 total, no casino");
        let outcome = run_batch(
            &policy,
            vec![
                Transaction::new(Money::from_major(60), "aws"),
                Transaction::new(Money::from_major(60), "gcp"),
                Transaction::new(Money::from_major(1), "Lucky Casino"),
            ],
        )
        .unwrap();
        let now = OffsetDateTime::now_utc();
        build_report(&policy, &outcome, now, now)
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = sample_report();
        let bytes = serialize_report(&report).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let parsed = parse_report_json(&text).unwrap();
        assert_eq!(parsed.entries, report.entries);
        assert_eq!(parsed.summary, report.summary);
        assert_eq!(parsed.policy, report.policy);
    }

    #[test]
    fn entries_flatten_receipt_fields() {
        let json = serde_json::to_value(sample_report()).unwrap();
        let entry = &json["entries"][1];
        assert_eq!(entry["index"], 1);
        assert_eq!(entry["status"], "rejected");
        assert_eq!(entry["failing_rule"], "spend.total_limit");
        assert_eq!(json["summary"]["rejections_by_rule"]["spend.total_limit"], 1);
        assert_eq!(json["summary"]["rejections_by_rule"]["spend.blocked_categories"], 1);
    }

    #[test]
    fn unknown_schema_is_rejected() {
        let err = parse_report_json(r#"{"schema": "spendguard.report.v0"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown report schema"));
    }

    #[test]
    fn renderable_carries_statuses_and_summary() {
        let renderable = to_renderable(&sample_report());
        assert_eq!(renderable.summary.total, 3);
        assert_eq!(renderable.summary.approved_spend, "60");
        assert_eq!(renderable.entries[0].status, RenderableStatus::Approved);
        assert_eq!(renderable.entries[1].status, RenderableStatus::Rejected);
        assert_eq!(renderable.entries[2].index, Some(2));
        assert_eq!(renderable.policy_lines, vec!["max 100 total", "blocked: casino"]);
    }
}
