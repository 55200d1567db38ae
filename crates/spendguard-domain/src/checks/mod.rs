use crate::model::{BudgetState, PolicyModel};
use spendguard_types::{CheckResult, Transaction};

pub(crate) mod approval_threshold;
mod allowed_destinations;
mod blocked_categories;
pub mod matching;
mod per_tx_limit;
mod require_purpose;
mod total_limit;


/// Run the rejecting checks in evaluation order. Each applicable check is recorded even when an
/// earlier one already failed; checks whose policy field is unset record nothing.
pub fn run_all(
    policy: &PolicyModel,
    tx: &Transaction,
    budget: &BudgetState,
    out: &mut Vec<CheckResult>,
) {
    per_tx_limit::run(policy, tx, out);
    total_limit::run(policy, tx, budget, out);
    allowed_destinations::run(policy, tx, out);
    blocked_categories::run(policy, tx, out);
    require_purpose::run(policy, tx, out);
}
