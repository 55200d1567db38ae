//! Pure spending-policy logic (no IO).
//!
//! Input: free-text policy, candidate transactions, and a caller-owned budget state.
//! Output: a compiled policy model, per-transaction decisions with check traces, and batch
//! summaries.

#![forbid(unsafe_code)]

pub mod batch;
pub mod checks;
pub mod compile;
pub mod error;
pub mod model;

mod engine;
mod fingerprint;

#[cfg(test)]
mod test_support;

pub use batch::{BatchEntry, BatchOutcome, run_batch, run_batch_from};
pub use compile::{CompileOutput, ExtractorId, compile, compile_traced};
pub use engine::{Evaluation, evaluate};
pub use error::{BatchError, ModelError, ValidationError};
pub use fingerprint::policy_fingerprint;
pub use model::{BudgetState, PolicyModel, WindowKind};
pub use spendguard_types::Transaction;
