//! The `evaluate` use case: one transaction against the resolved policy and budget.

use crate::config;
use anyhow::Context;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use spendguard_domain::{BudgetState, PolicyModel, evaluate, policy_fingerprint};
use spendguard_settings::Overrides;
use spendguard_types::{EvaluationReceipt, SCHEMA_EVALUATION_V1, Transaction};
use tracing::info;

#[derive(Clone, Debug)]
pub struct EvaluateInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    pub overrides: Overrides,
    pub transaction: Transaction,
}

/// Evaluator output: `status`, `reason` and `checks`, plus the budget after accrual.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvaluationDocument {
    pub schema: String,
    pub policy_fingerprint: String,
    pub transaction: Transaction,
    #[serde(flatten)]
    pub receipt: EvaluationReceipt,
    /// Budget after this decision; unchanged unless approved.
    pub budget: BudgetState,
}

#[derive(Clone, Debug)]
pub struct EvaluateOutput {
    pub document: EvaluationDocument,
    pub policy: PolicyModel,
}

pub fn run_evaluate(input: EvaluateInput<'_>) -> anyhow::Result<EvaluateOutput> {
    let resolved = config::load(input.config_text, input.overrides)?;
    let policy = resolved.policy;
    let mut budget = resolved.budget;
    let tx = input.transaction;

    let evaluation = evaluate(&policy, &tx, &budget).context("evaluate transaction")?;
    budget
        .record(&evaluation.decision, tx.amount)
        .context("record approved spend")?;

    let receipt = evaluation.to_receipt();
    info!(
        status = receipt.status.as_str(),
        spent_in_window = %budget.spent_in_window,
        "transaction evaluated"
    );

    Ok(EvaluateOutput {
        document: EvaluationDocument {
            schema: SCHEMA_EVALUATION_V1.to_string(),
            policy_fingerprint: policy_fingerprint(&policy),
            transaction: tx,
            receipt,
            budget,
        },
        policy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendguard_types::{DecisionStatus, Money, RuleKind};

    fn input<'a>(
        config_text: &'a str,
        overrides: Overrides,
        amount: i64,
        dest: &str,
    ) -> EvaluateInput<'a> {
        EvaluateInput {
            config_text,
            overrides,
            transaction: Transaction::new(Money::from_major(amount), dest),
        }
    }

    fn policy(text: &str) -> Overrides {
        Overrides {
            policy: Some(text.to_string()),
            ..Overrides::default()
        }
    }

    #[test]
    fn approval_accrues_budget() {
        let out = run_evaluate(input(
            "[budget]\nspent_in_window = 10\n",
            policy("$100 total"),
            25,
            "aws",
        ))
        .unwrap();
        assert_eq!(out.document.receipt.status, DecisionStatus::Approved);
        assert_eq!(out.document.budget.spent_in_window, Money::from_major(35));
    }

    #[test]
    fn escalation_leaves_budget_alone() {
        let out = run_evaluate(input(
            "",
            policy("Max $50 per transaction, only OpenAI and Anthropic, approval above $40"),
            45,
            "OpenAI API",
        ))
        .unwrap();
        let doc = out.document;
        assert_eq!(doc.receipt.status, DecisionStatus::ApprovalRequired);
        assert_eq!(doc.receipt.threshold_amount, Some(Money::from_major(40)));
        assert_eq!(doc.receipt.reason, "amount 45 exceeds approval threshold 40");
        assert_eq!(doc.budget.spent_in_window, Money::ZERO);
    }

    #[test]
    fn document_json_has_status_reason_and_checks() {
        let out = run_evaluate(input("", policy("no casino"), 5, "Lucky Casino")).unwrap();
        let json = serde_json::to_value(&out.document).unwrap();
        assert_eq!(json["schema"], SCHEMA_EVALUATION_V1);
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["failing_rule"], RuleKind::BlockedCategories.id());
        assert_eq!(json["checks"][0]["label"], "Blocked categories");
        assert_eq!(json["checks"][0]["passed"], false);
        assert!(
            json["reason"]
                .as_str()
                .unwrap()
                .starts_with("Blocked categories failed:")
        );
    }

    #[test]
    fn negative_amount_is_an_error_not_a_rejection() {
        let err = run_evaluate(input("", policy(""), -1, "aws")).unwrap_err();
        assert!(format!("{err:#}").contains("must not be negative"));
    }
}
