use spendguard_types::Money;

/// A policy model that violates its structural invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("{field} must not be negative (got {value})")]
    NegativeLimit { field: &'static str, value: Money },

    #[error("approval_threshold must not be negative (got {value})")]
    NegativeThreshold { value: Money },

    #[error("{field} contains an empty entry")]
    EmptyEntry { field: &'static str },
}

/// The input cannot be evaluated. Distinct from a `Rejected` decision, which means the
/// transaction was evaluated and denied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("transaction amount must not be negative (got {amount})")]
    NegativeAmount { amount: Money },

    #[error("budget spent_in_window must not be negative (got {spent})")]
    NegativeSpend { spent: Money },

    #[error("running total overflowed: {spent} + {amount}")]
    BudgetOverflow { spent: Money, amount: Money },

    #[error("invalid policy: {0}")]
    InvalidPolicy(#[from] ModelError),
}

/// A batch stopped at the first transaction that could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transaction #{index} cannot be evaluated: {source}")]
pub struct BatchError {
    pub index: usize,
    #[source]
    pub source: ValidationError,
}
