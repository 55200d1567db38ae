use super::matching::first_match;
use crate::model::{PolicyModel, join_set};
use spendguard_types::{CheckResult, RuleKind, Transaction};

pub fn run(policy: &PolicyModel, tx: &Transaction, out: &mut Vec<CheckResult>) {
    if policy.allowed_destinations.is_empty() {
        return;
    }

    match first_match(&tx.destination, &policy.allowed_destinations) {
        Some(entry) => out.push(CheckResult::pass(
            RuleKind::AllowedDestinations,
            format!(
                "destination '{}' contains allowed entry '{entry}'",
                tx.destination
            ),
        )),
        None => out.push(CheckResult::fail(
            RuleKind::AllowedDestinations,
            format!(
                "destination '{}' contains none of the allowed entries [{}]",
                tx.destination,
                join_set(&policy.allowed_destinations)
            ),
        )),
    }
}
