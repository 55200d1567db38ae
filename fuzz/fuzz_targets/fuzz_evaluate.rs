//! Structured fuzz target for the evaluator.
//!
//! Goal: evaluation never panics, and the decision agrees with the recorded checks:
//! a rejection names the first failed check, escalation only follows all-passing checks,
//! and only approvals move the running total.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_evaluate
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use spendguard_domain::{BudgetState, Transaction, compile, evaluate};
use spendguard_types::{Decision, Money};

#[derive(Debug, Arbitrary)]
struct Input {
    policy: String,
    amount_cents: i64,
    spent_cents: i64,
    destination: String,
    purpose: String,
}

fuzz_target!(|input: Input| {
    let policy = compile(&input.policy);
    let tx = Transaction::new(Money::from_minor(input.amount_cents), input.destination)
        .with_purpose(input.purpose);
    let mut budget = BudgetState::with_spent(Money::from_minor(input.spent_cents));
    let before = budget;

    let Ok(evaluation) = evaluate(&policy, &tx, &budget) else {
        return;
    };

    let first_failure = evaluation.checks.iter().find(|c| !c.passed);
    match &evaluation.decision {
        Decision::Rejected { failing_rule } => {
            assert_eq!(first_failure.map(|c| c.rule), Some(*failing_rule));
        }
        Decision::ApprovalRequired { .. } => assert!(first_failure.is_none()),
        Decision::Approved => assert!(first_failure.is_none()),
    }

    if budget.record(&evaluation.decision, tx.amount).is_ok() {
        if evaluation.decision.is_approved() {
            assert_eq!(
                before.spent_in_window.checked_add(tx.amount),
                Some(budget.spent_in_window)
            );
        } else {
            assert_eq!(budget, before);
        }
    }
});
