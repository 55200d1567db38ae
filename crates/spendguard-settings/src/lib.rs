//! Config parsing and policy resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{BudgetConfig, PolicyOverrides, SimulationConfig, SpendguardConfigV1};
pub use resolve::{Overrides, ResolvedConfig, SimulationSettings};

/// Schema string accepted in `spendguard.toml`.
pub const SCHEMA_CONFIG_V1: &str = "spendguard.config.v1";

/// Parse `spendguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<SpendguardConfigV1> {
    let cfg: SpendguardConfigV1 = toml::from_str(input)?;
    if let Some(schema) = cfg.schema.as_deref()
        && schema != SCHEMA_CONFIG_V1
    {
        anyhow::bail!("unsupported config schema: {schema} (expected {SCHEMA_CONFIG_V1})");
    }
    Ok(cfg)
}

/// Resolve the effective policy, starting budget and simulation settings.
pub fn resolve_config(
    cfg: SpendguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
