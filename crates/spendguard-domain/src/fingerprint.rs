use crate::model::PolicyModel;
use sha2::{Digest, Sha256};
use spendguard_types::Money;
use std::collections::BTreeSet;

/// Compute a stable SHA-256 fingerprint for a compiled policy.
///
/// Identity fields, in order:
/// - per_tx_limit
/// - total_limit
/// - time_window
/// - allowed_merchants (sorted)
/// - blocked_categories (sorted)
/// - approval_threshold
/// - require_purpose
///
/// Amounts are normalized, so `50` and `50.00` fingerprint the same.
pub fn policy_fingerprint(policy: &PolicyModel) -> String {
    let parts = [
        format!("per_tx_limit={}", amount(policy.per_tx_limit)),
        format!("total_limit={}", amount(policy.total_limit)),
        format!(
            "time_window={}",
            policy.time_window.map(|w| w.as_str()).unwrap_or("")
        ),
        format!("allowed_merchants={}", entries(&policy.allowed_destinations)),
        format!("blocked_categories={}", entries(&policy.blocked_categories)),
        format!("approval_threshold={}", amount(policy.approval_threshold)),
        format!("require_purpose={}", policy.require_purpose),
    ];
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}

fn amount(value: Option<Money>) -> String {
    value
        .map(|m| m.as_decimal().normalize().to_string())
        .unwrap_or_default()
}

fn entries(set: &BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}
