use crate::model::PolicyModel;
use spendguard_types::{CheckResult, RuleKind, Transaction};

pub fn run(policy: &PolicyModel, tx: &Transaction, out: &mut Vec<CheckResult>) {
    if !policy.require_purpose {
        return;
    }

    let purpose = tx.purpose.trim();
    if purpose.is_empty() {
        out.push(CheckResult::fail(RuleKind::RequirePurpose, "purpose is empty"));
    } else {
        out.push(CheckResult::pass(
            RuleKind::RequirePurpose,
            format!("purpose provided: '{purpose}'"),
        ));
    }
}
