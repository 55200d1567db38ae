use crate::model::{BudgetState, PolicyModel};
use spendguard_types::{CheckResult, RuleKind, Transaction};

/// Compares the hypothetical new total against the limit. Never touches `budget`.
pub fn run(
    policy: &PolicyModel,
    tx: &Transaction,
    budget: &BudgetState,
    out: &mut Vec<CheckResult>,
) {
    let Some(limit) = policy.total_limit else {
        return;
    };
    let spent = budget.spent_in_window;
    let window = match policy.time_window {
        Some(w) => format!(" ({} window)", w.as_str()),
        None => String::new(),
    };

    let Some(new_total) = spent.checked_add(tx.amount) else {
        out.push(CheckResult::fail(
            RuleKind::TotalLimit,
            format!(
                "spent {spent} + amount {} overflows; total limit {limit}{window}",
                tx.amount
            ),
        ));
        return;
    };

    let (passed, op) = if new_total <= limit {
        (true, "<=")
    } else {
        (false, ">")
    };
    let detail = format!(
        "spent {spent} + amount {} = {new_total} {op} total limit {limit}{window}",
        tx.amount
    );
    out.push(if passed {
        CheckResult::pass(RuleKind::TotalLimit, detail)
    } else {
        CheckResult::fail(RuleKind::TotalLimit, detail)
    });
}
