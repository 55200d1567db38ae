//! Fuzz target for `spendguard.toml` parsing and resolution.
//!
//! Goal: never panic. Malformed configs must surface as errors.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use spendguard_settings::{Overrides, parse_config_toml, resolve_config};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data)
        && let Ok(cfg) = parse_config_toml(text)
        && let Ok(resolved) = resolve_config(cfg, Overrides::default())
    {
        assert!(resolved.policy.validate().is_ok());
    }
});
