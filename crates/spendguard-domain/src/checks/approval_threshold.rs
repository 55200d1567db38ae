use crate::model::PolicyModel;
use spendguard_types::{CheckResult, Money, RuleKind, Transaction};

/// Runs only after every rejecting check passed. Returns the breached threshold when the
/// transaction must be escalated; the recorded check stays `passed`.
pub fn run(policy: &PolicyModel, tx: &Transaction, out: &mut Vec<CheckResult>) -> Option<Money> {
    let threshold = policy.approval_threshold?;

    if tx.amount > threshold {
        out.push(CheckResult::escalate(
            RuleKind::ApprovalThreshold,
            format!(
                "amount {} > approval threshold {threshold}; escalation required",
                tx.amount
            ),
        ));
        Some(threshold)
    } else {
        out.push(CheckResult::pass(
            RuleKind::ApprovalThreshold,
            format!("amount {} <= approval threshold {threshold}", tx.amount),
        ));
        None
    }
}
