use crate::model::PolicyModel;
use spendguard_types::{CheckResult, RuleKind, Transaction};

pub fn run(policy: &PolicyModel, tx: &Transaction, out: &mut Vec<CheckResult>) {
    let Some(limit) = policy.per_tx_limit else {
        return;
    };

    if tx.amount <= limit {
        out.push(CheckResult::pass(
            RuleKind::PerTxLimit,
            format!("amount {} <= per-transaction limit {}", tx.amount, limit),
        ));
    } else {
        out.push(CheckResult::fail(
            RuleKind::PerTxLimit,
            format!("amount {} > per-transaction limit {}", tx.amount, limit),
        ));
    }
}
