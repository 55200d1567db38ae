use super::matching::first_match;
use crate::model::{PolicyModel, join_set};
use spendguard_types::{CheckResult, RuleKind, Transaction};

/// Independent of the allow-list: a destination matching both lists fails here.
pub fn run(policy: &PolicyModel, tx: &Transaction, out: &mut Vec<CheckResult>) {
    if policy.blocked_categories.is_empty() {
        return;
    }

    match first_match(&tx.destination, &policy.blocked_categories) {
        Some(entry) => out.push(CheckResult::fail(
            RuleKind::BlockedCategories,
            format!(
                "destination '{}' contains blocked entry '{entry}'",
                tx.destination
            ),
        )),
        None => out.push(CheckResult::pass(
            RuleKind::BlockedCategories,
            format!(
                "destination '{}' contains none of the blocked entries [{}]",
                tx.destination,
                join_set(&policy.blocked_categories)
            ),
        )),
    }
}
