//! Fuzz target for policy compilation.
//!
//! Goal: compilation is total. Any text yields a policy that passes structural validation,
//! and ASCII letter case never changes the result.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_compile
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let policy = spendguard_domain::compile(text);
        assert!(policy.validate().is_ok(), "compiled policy failed validation");
        assert_eq!(policy, spendguard_domain::compile(&text.to_ascii_uppercase()));
    }
});
