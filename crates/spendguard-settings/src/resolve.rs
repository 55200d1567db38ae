use crate::model::{PolicyOverrides, SimulationConfig, SpendguardConfigV1};
use anyhow::Context;
use spendguard_domain::{BudgetState, ExtractorId, PolicyModel, WindowKind, compile_traced};
use spendguard_types::Money;
use std::collections::BTreeSet;
use tracing::debug;

const DEFAULT_SEED: u64 = 0;
const DEFAULT_COUNT: u32 = 10;
const DEFAULT_DESTINATIONS: &[&str] = &[
    "OpenAI API",
    "Anthropic",
    "AWS",
    "Google Cloud",
    "Lucky Casino",
];
const DEFAULT_PURPOSES: &[&str] = &["inference", "embedding batch", "fine-tuning", ""];

/// CLI-level overrides; each one beats the matching config value.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub policy: Option<String>,
    pub spent_in_window: Option<Money>,
    pub seed: Option<u64>,
    pub count: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    /// Text that was compiled (empty when none was configured).
    pub policy_text: String,
    /// Extractors that fired on `policy_text`.
    pub matched: Vec<ExtractorId>,
    /// Compiled policy with `[overrides]` applied; validated.
    pub policy: PolicyModel,
    pub budget: BudgetState,
    pub simulation: SimulationSettings,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationSettings {
    pub seed: u64,
    pub count: u32,
    pub min_amount: Money,
    pub max_amount: Money,
    pub destinations: Vec<String>,
    pub purposes: Vec<String>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            count: DEFAULT_COUNT,
            min_amount: Money::from_major(1),
            max_amount: Money::from_major(100),
            destinations: DEFAULT_DESTINATIONS.iter().map(|s| s.to_string()).collect(),
            purposes: DEFAULT_PURPOSES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub fn resolve_config(
    cfg: SpendguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let policy_text = overrides.policy.or(cfg.policy).unwrap_or_default();

    let compiled = compile_traced(&policy_text);
    let mut policy = compiled.policy;
    apply_overrides(&mut policy, &cfg.overrides)?;
    policy.validate().context("invalid policy after applying [overrides]")?;

    let spent = overrides
        .spent_in_window
        .or(cfg.budget.spent_in_window)
        .unwrap_or(Money::ZERO);
    if spent.is_negative() {
        anyhow::bail!("budget spent_in_window must not be negative (got {spent})");
    }

    let mut simulation = resolve_simulation(&cfg.simulation)?;
    if let Some(seed) = overrides.seed {
        simulation.seed = seed;
    }
    if let Some(count) = overrides.count {
        simulation.count = count;
    }

    debug!(
        matched = compiled.matched.len(),
        noop = policy.is_noop(),
        "config resolved"
    );

    Ok(ResolvedConfig {
        policy_text,
        matched: compiled.matched,
        policy,
        budget: BudgetState::with_spent(spent),
        simulation,
    })
}

fn apply_overrides(policy: &mut PolicyModel, o: &PolicyOverrides) -> anyhow::Result<()> {
    if let Some(v) = o.per_tx_limit {
        policy.per_tx_limit = Some(v);
    }
    if let Some(v) = o.total_limit {
        policy.total_limit = Some(v);
    }
    if let Some(window) = o.time_window.as_deref() {
        policy.time_window = Some(parse_window(window)?);
    }
    if let Some(entries) = &o.allowed_merchants {
        policy.allowed_destinations = normalize_entries(entries);
    }
    if let Some(entries) = &o.blocked_categories {
        policy.blocked_categories = normalize_entries(entries);
    }
    if let Some(v) = o.approval_threshold {
        policy.approval_threshold = Some(v);
    }
    if let Some(v) = o.require_purpose {
        policy.require_purpose = v;
    }
    Ok(())
}

// Blank entries are kept so validation can report them instead of silently dropping them.
fn normalize_entries(entries: &[String]) -> BTreeSet<String> {
    entries.iter().map(|e| e.trim().to_lowercase()).collect()
}

fn parse_window(v: &str) -> anyhow::Result<WindowKind> {
    match v {
        "24h" => Ok(WindowKind::Day24h),
        other => anyhow::bail!("unknown time_window: {other} (expected '24h')"),
    }
}

fn resolve_simulation(cfg: &SimulationConfig) -> anyhow::Result<SimulationSettings> {
    let defaults = SimulationSettings::default();
    let settings = SimulationSettings {
        seed: cfg.seed.unwrap_or(defaults.seed),
        count: cfg.count.unwrap_or(defaults.count),
        min_amount: cfg.min_amount.unwrap_or(defaults.min_amount),
        max_amount: cfg.max_amount.unwrap_or(defaults.max_amount),
        destinations: cfg.destinations.clone().unwrap_or(defaults.destinations),
        purposes: cfg.purposes.clone().unwrap_or(defaults.purposes),
    };

    if settings.min_amount.is_negative() || settings.max_amount.is_negative() {
        anyhow::bail!("simulation amounts must not be negative");
    }
    if settings.min_amount > settings.max_amount {
        anyhow::bail!(
            "simulation min_amount {} is greater than max_amount {}",
            settings.min_amount,
            settings.max_amount
        );
    }
    if settings.destinations.is_empty() {
        anyhow::bail!("simulation destinations must not be empty");
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BudgetConfig, SimulationConfig};

    fn cfg_with_policy(text: &str) -> SpendguardConfigV1 {
        SpendguardConfigV1 {
            policy: Some(text.to_string()),
            ..SpendguardConfigV1::default()
        }
    }

    #[test]
    fn defaults_resolve_to_noop_policy() {
        let resolved = resolve_config(SpendguardConfigV1::default(), Overrides::default()).unwrap();
        assert!(resolved.policy.is_noop());
        assert_eq!(resolved.policy_text, "");
        assert_eq!(resolved.budget, BudgetState::new());
        assert_eq!(resolved.simulation, SimulationSettings::default());
    }

    #[test]
    fn override_text_beats_config_text() {
        let resolved = resolve_config(
            cfg_with_policy("max $10 per tx"),
            Overrides {
                policy: Some("max $20 per tx".to_string()),
                ..Overrides::default()
            },
        )
        .unwrap();
        assert_eq!(resolved.policy.per_tx_limit, Some(Money::from_major(20)));
        assert_eq!(resolved.matched, vec![ExtractorId::PerTxLimit]);
    }

    #[test]
    fn structured_overrides_replace_compiled_fields() {
        let mut cfg = cfg_with_policy("max $10 per tx, only openai");
        cfg.overrides = PolicyOverrides {
            per_tx_limit: Some(Money::from_major(99)),
            allowed_merchants: Some(vec![" Anthropic ".to_string(), "AWS".to_string()]),
            time_window: Some("24h".to_string()),
            require_purpose: Some(true),
            ..PolicyOverrides::default()
        };

        let policy = resolve_config(cfg, Overrides::default()).unwrap().policy;
        assert_eq!(policy.per_tx_limit, Some(Money::from_major(99)));
        assert_eq!(
            policy.allowed_destinations.into_iter().collect::<Vec<_>>(),
            vec!["anthropic", "aws"]
        );
        assert_eq!(policy.time_window, Some(WindowKind::Day24h));
        assert!(policy.require_purpose);
    }

    #[test]
    fn invalid_overrides_are_errors() {
        let mut cfg = SpendguardConfigV1::default();
        cfg.overrides.total_limit = Some(Money::from_major(-5));
        assert!(resolve_config(cfg, Overrides::default()).is_err());

        let mut cfg = SpendguardConfigV1::default();
        cfg.overrides.blocked_categories = Some(vec!["  ".to_string()]);
        assert!(resolve_config(cfg, Overrides::default()).is_err());

        let mut cfg = SpendguardConfigV1::default();
        cfg.overrides.time_window = Some("weekly".to_string());
        let err = resolve_config(cfg, Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("unknown time_window"));
    }

    #[test]
    fn budget_comes_from_override_then_config() {
        let cfg = SpendguardConfigV1 {
            budget: BudgetConfig {
                spent_in_window: Some(Money::from_major(30)),
            },
            ..SpendguardConfigV1::default()
        };
        let resolved = resolve_config(cfg.clone(), Overrides::default()).unwrap();
        assert_eq!(resolved.budget.spent_in_window, Money::from_major(30));

        let resolved = resolve_config(
            cfg,
            Overrides {
                spent_in_window: Some(Money::from_major(5)),
                ..Overrides::default()
            },
        )
        .unwrap();
        assert_eq!(resolved.budget.spent_in_window, Money::from_major(5));
    }

    #[test]
    fn simulation_bounds_are_checked() {
        let cfg = SpendguardConfigV1 {
            simulation: SimulationConfig {
                min_amount: Some(Money::from_major(10)),
                max_amount: Some(Money::from_major(5)),
                ..SimulationConfig::default()
            },
            ..SpendguardConfigV1::default()
        };
        let err = resolve_config(cfg, Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("greater than max_amount"));

        let cfg = SpendguardConfigV1 {
            simulation: SimulationConfig {
                min_amount: Some(Money::from_major(-1)),
                ..SimulationConfig::default()
            },
            ..SpendguardConfigV1::default()
        };
        assert!(resolve_config(cfg, Overrides::default()).is_err());
    }

    #[test]
    fn seed_and_count_overrides_apply() {
        let resolved = resolve_config(
            SpendguardConfigV1::default(),
            Overrides {
                seed: Some(7),
                count: Some(3),
                ..Overrides::default()
            },
        )
        .unwrap();
        assert_eq!(resolved.simulation.seed, 7);
        assert_eq!(resolved.simulation.count, 3);
    }
}
