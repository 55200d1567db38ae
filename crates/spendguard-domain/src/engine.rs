use crate::checks;
use crate::error::ValidationError;
use crate::model::{BudgetState, PolicyModel};
use spendguard_types::{CheckResult, Decision, EvaluationReceipt, Money, Transaction};
use tracing::debug;

/// Decision plus the full check trace that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    /// Amount of the evaluated transaction.
    pub amount: Money,
    pub decision: Decision,
    pub checks: Vec<CheckResult>,
}

impl Evaluation {
    /// Human-readable summary of the decisive check.
    pub fn reason(&self) -> String {
        match &self.decision {
            Decision::Approved if self.checks.is_empty() => "no checks configured".to_string(),
            Decision::Approved => "all checks passed".to_string(),
            Decision::Rejected { failing_rule } => {
                match self.checks.iter().find(|c| c.rule == *failing_rule && !c.passed) {
                    Some(check) => format!("{} failed: {}", check.label, check.detail),
                    None => format!("{} failed", failing_rule.label()),
                }
            }
            Decision::ApprovalRequired { threshold_amount } => format!(
                "amount {} exceeds approval threshold {threshold_amount}",
                self.amount
            ),
        }
    }

    pub fn to_receipt(&self) -> EvaluationReceipt {
        let (failing_rule, threshold_amount) = match &self.decision {
            Decision::Approved => (None, None),
            Decision::Rejected { failing_rule } => (Some(*failing_rule), None),
            Decision::ApprovalRequired { threshold_amount } => (None, Some(*threshold_amount)),
        };
        EvaluationReceipt {
            status: self.decision.status(),
            reason: self.reason(),
            failing_rule,
            threshold_amount,
            checks: self.checks.clone(),
        }
    }

    pub fn into_parts(self) -> (Decision, Vec<CheckResult>) {
        (self.decision, self.checks)
    }
}

/// Evaluate one transaction. Pure: `budget` is read, never written.
///
/// Errors only when the input cannot be evaluated (invalid policy, negative amount or spend).
/// A denied transaction is `Ok` with `Decision::Rejected`.
pub fn evaluate(
    policy: &PolicyModel,
    tx: &Transaction,
    budget: &BudgetState,
) -> Result<Evaluation, ValidationError> {
    policy.validate()?;
    if tx.amount.is_negative() {
        return Err(ValidationError::NegativeAmount { amount: tx.amount });
    }
    if budget.spent_in_window.is_negative() {
        return Err(ValidationError::NegativeSpend {
            spent: budget.spent_in_window,
        });
    }

    let mut trace = Vec::new();
    checks::run_all(policy, tx, budget, &mut trace);

    // First failure in evaluation order decides; the threshold is never consulted after one.
    let decision = match trace.iter().find(|c| !c.passed) {
        Some(failed) => Decision::Rejected {
            failing_rule: failed.rule,
        },
        None => match checks::approval_threshold::run(policy, tx, &mut trace) {
            Some(threshold_amount) => Decision::ApprovalRequired { threshold_amount },
            None => Decision::Approved,
        },
    };

    debug!(
        amount = %tx.amount,
        destination = %tx.destination,
        status = decision.status().as_str(),
        checks = trace.len(),
        "transaction evaluated"
    );

    Ok(Evaluation {
        amount: tx.amount,
        decision,
        checks: trace,
    })
}
