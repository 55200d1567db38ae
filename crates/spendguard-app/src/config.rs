use anyhow::Context;
use spendguard_settings::{Overrides, ResolvedConfig, SpendguardConfigV1};

/// Parse config text (empty is allowed, defaults apply) and resolve it.
pub(crate) fn load(config_text: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let cfg = if config_text.trim().is_empty() {
        SpendguardConfigV1::default()
    } else {
        spendguard_settings::parse_config_toml(config_text).context("parse config")?
    };
    spendguard_settings::resolve_config(cfg, overrides).context("resolve config")
}
