//! Sequential batch simulation with a running budget.

use crate::engine::{Evaluation, evaluate};
use crate::error::BatchError;
use crate::model::{BudgetState, PolicyModel};
use spendguard_types::{BatchSummary, Decision, DecisionStatus, Transaction};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchEntry {
    pub transaction: Transaction,
    pub evaluation: Evaluation,
}

impl BatchEntry {
    pub fn decision(&self) -> &Decision {
        &self.evaluation.decision
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOutcome {
    /// One entry per input transaction, in input order.
    pub entries: Vec<BatchEntry>,
    pub summary: BatchSummary,
    /// Budget after the last transaction.
    pub budget: BudgetState,
}

impl BatchOutcome {
    pub fn statuses(&self) -> Vec<DecisionStatus> {
        self.entries.iter().map(|e| e.decision().status()).collect()
    }
}

/// Run a batch from an empty budget.
pub fn run_batch<I>(policy: &PolicyModel, transactions: I) -> Result<BatchOutcome, BatchError>
where
    I: IntoIterator<Item = Transaction>,
{
    run_batch_from(policy, BudgetState::new(), transactions)
}

/// Run a batch in input order, accruing each approved amount before the next evaluation.
///
/// Order matters: the same transactions in a different order may be decided differently.
/// Stops at the first transaction that cannot be evaluated.
pub fn run_batch_from<I>(
    policy: &PolicyModel,
    mut budget: BudgetState,
    transactions: I,
) -> Result<BatchOutcome, BatchError>
where
    I: IntoIterator<Item = Transaction>,
{
    let mut entries = Vec::new();
    let mut summary = BatchSummary::default();

    for (index, transaction) in transactions.into_iter().enumerate() {
        let evaluation = evaluate(policy, &transaction, &budget)
            .map_err(|source| BatchError { index, source })?;

        budget
            .record(&evaluation.decision, transaction.amount)
            .map_err(|source| BatchError { index, source })?;
        tally(&mut summary, &evaluation.decision, &transaction);

        debug!(
            index,
            status = evaluation.decision.status().as_str(),
            spent_in_window = %budget.spent_in_window,
            "batch step"
        );

        entries.push(BatchEntry {
            transaction,
            evaluation,
        });
    }

    Ok(BatchOutcome {
        entries,
        summary,
        budget,
    })
}

fn tally(summary: &mut BatchSummary, decision: &Decision, tx: &Transaction) {
    summary.total += 1;
    match decision {
        Decision::Approved => {
            summary.approved += 1;
            // Budget accrual already succeeded with the same addition on a larger total.
            if let Some(sum) = summary.approved_spend.checked_add(tx.amount) {
                summary.approved_spend = sum;
            }
        }
        Decision::Rejected { failing_rule } => {
            summary.rejected += 1;
            *summary
                .rejections_by_rule
                .entry(failing_rule.id().to_string())
                .or_insert(0) += 1;
        }
        Decision::ApprovalRequired { .. } => summary.approval_required += 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::error::ValidationError;
    use crate::test_support::{budget, money, tx};
    use spendguard_types::RuleKind;

    #[test]
    fn running_total_makes_order_matter() {
        let policy = compile("$100 total");
        let txs = vec![tx("60", "aws"), tx("60", "gcp")];

        let outcome = run_batch(&policy, txs.clone()).unwrap();
        assert_eq!(
            outcome.statuses(),
            vec![DecisionStatus::Approved, DecisionStatus::Rejected]
        );
        assert_eq!(outcome.budget, budget("60"));

        // The second transaction alone is fine.
        let alone = run_batch(&policy, txs.into_iter().skip(1)).unwrap();
        assert_eq!(alone.statuses(), vec![DecisionStatus::Approved]);
    }

    #[test]
    fn escalated_and_rejected_do_not_accrue() {
        let policy = compile("max $50 per tx, $100 total, approval above $30");
        let outcome = run_batch(
            &policy,
            vec![
                tx("40", "a"), // escalated
                tx("70", "b"), // rejected by per-tx
                tx("30", "c"),
                tx("30", "d"),
                tx("30", "e"),
                tx("20", "f"), // 90 + 20 > 100
            ],
        )
        .unwrap();

        assert_eq!(
            outcome.statuses(),
            vec![
                DecisionStatus::ApprovalRequired,
                DecisionStatus::Rejected,
                DecisionStatus::Approved,
                DecisionStatus::Approved,
                DecisionStatus::Approved,
                DecisionStatus::Rejected,
            ]
        );
        assert_eq!(outcome.budget.spent_in_window, money("90"));

        let s = &outcome.summary;
        assert_eq!((s.total, s.approved, s.rejected, s.approval_required), (6, 3, 2, 1));
        assert_eq!(s.approved_spend, money("90"));
        assert_eq!(s.rejections_by_rule.get(RuleKind::PerTxLimit.id()), Some(&1));
        assert_eq!(s.rejections_by_rule.get(RuleKind::TotalLimit.id()), Some(&1));
    }

    #[test]
    fn starting_budget_is_respected() {
        let policy = compile("$100 total");
        let outcome = run_batch_from(&policy, budget("95"), vec![tx("10", "aws")]).unwrap();
        assert_eq!(outcome.statuses(), vec![DecisionStatus::Rejected]);
        assert_eq!(outcome.budget, budget("95"));
    }

    #[test]
    fn empty_batch_is_empty_outcome() {
        let outcome = run_batch(&compile("max $5"), Vec::new()).unwrap();
        assert!(outcome.entries.is_empty());
        assert_eq!(outcome.summary, BatchSummary::default());
    }

    #[test]
    fn invalid_transaction_stops_the_batch_with_its_index() {
        let err = run_batch(
            &compile(""),
            vec![tx("1", "a"), tx("-2", "b"), tx("3", "c")],
        )
        .unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(
            err.source,
            ValidationError::NegativeAmount {
                amount: money("-2")
            }
        );
    }
}
