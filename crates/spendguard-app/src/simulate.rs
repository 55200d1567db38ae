//! The `simulate` use case: run a batch and produce a report.

use crate::config;
use crate::report::{SpendguardReport, build_report};
use anyhow::Context;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use spendguard_domain::{BudgetState, run_batch_from};
use spendguard_settings::{Overrides, SimulationSettings};
use spendguard_types::{Money, Transaction};
use time::OffsetDateTime;
use tracing::info;

const SYNTHETIC_TOKEN: &str = "USDC";

#[derive(Clone, Debug)]
pub struct SimulateInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    pub overrides: Overrides,
    /// Supplied transactions; synthetic ones are generated from `[simulation]` when `None`.
    pub transactions: Option<Vec<Transaction>>,
}

#[derive(Clone, Debug)]
pub struct SimulateOutput {
    pub report: SpendguardReport,
    /// Budget after the last transaction.
    pub budget: BudgetState,
}

pub fn run_simulate(input: SimulateInput<'_>) -> anyhow::Result<SimulateOutput> {
    let started_at = OffsetDateTime::now_utc();

    let resolved = config::load(input.config_text, input.overrides)?;
    let transactions = match input.transactions {
        Some(txs) => txs,
        None => synthetic_transactions(&resolved.simulation)?,
    };

    let outcome = run_batch_from(&resolved.policy, resolved.budget, transactions)
        .context("run batch")?;

    let finished_at = OffsetDateTime::now_utc();
    let s = &outcome.summary;
    info!(
        total = s.total,
        approved = s.approved,
        rejected = s.rejected,
        approval_required = s.approval_required,
        "batch finished"
    );

    Ok(SimulateOutput {
        report: build_report(&resolved.policy, &outcome, started_at, finished_at),
        budget: outcome.budget,
    })
}

/// Deterministic synthetic transactions: same settings, same sequence.
///
/// Amounts are whole cents drawn uniformly from `[min_amount, max_amount]`.
pub fn synthetic_transactions(settings: &SimulationSettings) -> anyhow::Result<Vec<Transaction>> {
    let lo = settings
        .min_amount
        .to_minor()
        .context("simulation min_amount out of range")?;
    let hi = settings
        .max_amount
        .to_minor()
        .context("simulation max_amount out of range")?;
    if lo > hi {
        anyhow::bail!("simulation min_amount is greater than max_amount");
    }

    let mut rng = StdRng::seed_from_u64(settings.seed);
    let txs = (0..settings.count)
        .map(|_| {
            let amount = Money::from_minor(rng.random_range(lo..=hi));
            let destination = settings
                .destinations
                .choose(&mut rng)
                .cloned()
                .unwrap_or_default();
            let purpose = settings
                .purposes
                .choose(&mut rng)
                .cloned()
                .unwrap_or_default();
            Transaction::new(amount, destination)
                .with_token(SYNTHETIC_TOKEN)
                .with_purpose(purpose)
        })
        .collect();
    Ok(txs)
}
