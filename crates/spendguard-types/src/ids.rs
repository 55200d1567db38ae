//! Stable identifiers for rules and check codes.
//!
//! `rule_id` is a dotted namespace. `code` is a short snake_case discriminator for a failure
//! (or escalation) of that rule.

// Rules
pub const RULE_PER_TX_LIMIT: &str = "spend.per_tx_limit";
pub const RULE_TOTAL_LIMIT: &str = "spend.total_limit";
pub const RULE_ALLOWED_DESTINATIONS: &str = "spend.allowed_destinations";
pub const RULE_BLOCKED_CATEGORIES: &str = "spend.blocked_categories";
pub const RULE_REQUIRE_PURPOSE: &str = "spend.require_purpose";
pub const RULE_APPROVAL_THRESHOLD: &str = "spend.approval_threshold";

// Codes: spend.per_tx_limit
pub const CODE_AMOUNT_OVER_LIMIT: &str = "amount_over_limit";

// Codes: spend.total_limit
pub const CODE_WINDOW_TOTAL_EXCEEDED: &str = "window_total_exceeded";

// Codes: spend.allowed_destinations
pub const CODE_DESTINATION_NOT_ALLOWED: &str = "destination_not_allowed";

// Codes: spend.blocked_categories
pub const CODE_DESTINATION_BLOCKED: &str = "destination_blocked";

// Codes: spend.require_purpose
pub const CODE_PURPOSE_MISSING: &str = "purpose_missing";

// Codes: spend.approval_threshold
pub const CODE_APPROVAL_REQUIRED: &str = "approval_required";
