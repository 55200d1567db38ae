use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use spendguard_types::Money;

/// `spendguard.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpendguardConfigV1 {
    /// Optional schema string for tooling (`spendguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Free-text policy, compiled before `[overrides]` are applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,

    #[serde(default)]
    pub overrides: PolicyOverrides,

    #[serde(default)]
    pub budget: BudgetConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Structured fields that replace the compiled ones. Amounts accept strings or numbers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_tx_limit: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_limit: Option<Money>,

    /// Only `24h` is recognized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window: Option<String>,

    /// Replaces the whole compiled allow-list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_merchants: Option<Vec<String>>,

    /// Replaces the whole compiled block-list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_categories: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_threshold: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_purpose: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BudgetConfig {
    /// Approved spend carried into this run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spent_in_window: Option<Money>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SimulationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Number of synthetic transactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destinations: Option<Vec<String>>,

    /// Empty strings are kept: they exercise the purpose requirement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purposes: Option<Vec<String>>,
}
