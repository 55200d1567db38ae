use crate::error::{ModelError, ValidationError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use spendguard_types::{Decision, Money};
use std::collections::BTreeSet;

/// Label for the window a total limit applies to.
///
/// Advisory only: the evaluator keeps a single running total per session and never rolls it
/// over. Rollover, if ever needed, belongs to the caller that owns the `BudgetState`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum WindowKind {
    #[serde(rename = "24h")]
    Day24h,
}

impl WindowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowKind::Day24h => "24h",
        }
    }
}

/// A compiled spending policy. Immutable once compiled.
///
/// The all-empty value is the no-op policy: it approves every well-formed transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyModel {
    #[serde(default)]
    pub per_tx_limit: Option<Money>,
    #[serde(default)]
    pub total_limit: Option<Money>,

    /// Case-insensitive substrings. Non-empty means allow-list: everything else is rejected.
    #[serde(default, rename = "allowed_merchants")]
    pub allowed_destinations: BTreeSet<String>,

    /// Case-insensitive substrings. A match rejects regardless of the allow-list.
    #[serde(default)]
    pub blocked_categories: BTreeSet<String>,

    /// Amounts strictly greater than this escalate, unless another check already rejected.
    #[serde(default)]
    pub approval_threshold: Option<Money>,

    #[serde(default)]
    pub time_window: Option<WindowKind>,

    #[serde(default)]
    pub require_purpose: bool,
}

impl PolicyModel {
    pub fn is_noop(&self) -> bool {
        self == &PolicyModel::default()
    }

    /// Structural invariants: non-negative amounts, no blank set entries.
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(v) = self.per_tx_limit
            && v.is_negative()
        {
            return Err(ModelError::NegativeLimit {
                field: "per_tx_limit",
                value: v,
            });
        }
        if let Some(v) = self.total_limit
            && v.is_negative()
        {
            return Err(ModelError::NegativeLimit {
                field: "total_limit",
                value: v,
            });
        }
        if let Some(v) = self.approval_threshold
            && v.is_negative()
        {
            return Err(ModelError::NegativeThreshold { value: v });
        }
        if self.allowed_destinations.iter().any(|e| e.trim().is_empty()) {
            return Err(ModelError::EmptyEntry {
                field: "allowed_merchants",
            });
        }
        if self.blocked_categories.iter().any(|e| e.trim().is_empty()) {
            return Err(ModelError::EmptyEntry {
                field: "blocked_categories",
            });
        }
        Ok(())
    }

    /// Short human-readable clauses, in evaluation order.
    pub fn describe(&self) -> Vec<String> {
        let mut out = Vec::new();

        if let Some(limit) = self.per_tx_limit {
            out.push(format!("max {limit} per transaction"));
        }
        if let Some(limit) = self.total_limit {
            match self.time_window {
                Some(window) => out.push(format!("max {limit} per {} window", window.as_str())),
                None => out.push(format!("max {limit} total")),
            }
        }
        if !self.allowed_destinations.is_empty() {
            out.push(format!("only: {}", join_set(&self.allowed_destinations)));
        }
        if !self.blocked_categories.is_empty() {
            out.push(format!("blocked: {}", join_set(&self.blocked_categories)));
        }
        if self.require_purpose {
            out.push("purpose required".to_string());
        }
        if let Some(threshold) = self.approval_threshold {
            out.push(format!("approval above {threshold}"));
        }

        if out.is_empty() {
            out.push("no constraints".to_string());
        }
        out
    }
}

pub(crate) fn join_set(set: &BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Running approved spend, threaded through a sequence of evaluations.
///
/// Owned by the caller. Concurrent evaluations against the same state must be serialized by
/// the caller: evaluate-then-record is a read-modify-write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BudgetState {
    #[serde(default)]
    pub spent_in_window: Money,
}

impl BudgetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spent(spent_in_window: Money) -> Self {
        Self { spent_in_window }
    }

    /// Accrue `amount` iff the decision approved it. Rejected and escalated transactions never
    /// count toward the running total.
    pub fn record(&mut self, decision: &Decision, amount: Money) -> Result<(), ValidationError> {
        if !decision.is_approved() {
            return Ok(());
        }
        self.spent_in_window =
            self.spent_in_window
                .checked_add(amount)
                .ok_or(ValidationError::BudgetOverflow {
                    spent: self.spent_in_window,
                    amount,
                })?;
        Ok(())
    }
}
