//! Explain registry for rules and codes.
//!
//! Maps rule IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a rule or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the rule/code.
    pub title: &'static str,
    /// What the rule checks and how it is phrased in policy text.
    pub description: &'static str,
    /// How to get a rejected transaction through (or change the policy).
    pub remediation: &'static str,
    /// Before/after policy text examples.
    pub examples: ExamplePair,
}

/// Before and after policy examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Policy (and transaction) that trips the rule.
    pub before: &'static str,
    /// A passing variant.
    pub after: &'static str,
}

/// Look up an explanation by rule_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Rule IDs
        ids::RULE_PER_TX_LIMIT => Some(explain_per_tx_limit()),
        ids::RULE_TOTAL_LIMIT => Some(explain_total_limit()),
        ids::RULE_ALLOWED_DESTINATIONS => Some(explain_allowed_destinations()),
        ids::RULE_BLOCKED_CATEGORIES => Some(explain_blocked_categories()),
        ids::RULE_REQUIRE_PURPOSE => Some(explain_require_purpose()),
        ids::RULE_APPROVAL_THRESHOLD => Some(explain_approval_threshold()),

        // Codes
        ids::CODE_AMOUNT_OVER_LIMIT => Some(explain_amount_over_limit()),
        ids::CODE_WINDOW_TOTAL_EXCEEDED => Some(explain_window_total_exceeded()),
        ids::CODE_DESTINATION_NOT_ALLOWED => Some(explain_destination_not_allowed()),
        ids::CODE_DESTINATION_BLOCKED => Some(explain_destination_blocked()),
        ids::CODE_PURPOSE_MISSING => Some(explain_purpose_missing()),
        ids::CODE_APPROVAL_REQUIRED => Some(explain_approval_required()),

        _ => None,
    }
}

/// List all known rule IDs, in evaluation order.
pub fn all_rule_ids() -> &'static [&'static str] {
    &[
        ids::RULE_PER_TX_LIMIT,
        ids::RULE_TOTAL_LIMIT,
        ids::RULE_ALLOWED_DESTINATIONS,
        ids::RULE_BLOCKED_CATEGORIES,
        ids::RULE_REQUIRE_PURPOSE,
        ids::RULE_APPROVAL_THRESHOLD,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_AMOUNT_OVER_LIMIT,
        ids::CODE_WINDOW_TOTAL_EXCEEDED,
        ids::CODE_DESTINATION_NOT_ALLOWED,
        ids::CODE_DESTINATION_BLOCKED,
        ids::CODE_PURPOSE_MISSING,
        ids::CODE_APPROVAL_REQUIRED,
    ]
}

// --- Rule-level explanations ---

fn explain_per_tx_limit() -> Explanation {
    Explanation {
        title: "Per-Transaction Limit",
        description: "\
Caps the amount of any single transaction.

Recognized phrasings (case-insensitive, `$` optional):
- `max $N per transaction` / `max $N per tx`
- a bare `max $N` when no other limit phrase is present

A transaction passes when its amount is less than or equal to the limit.",
        remediation: "\
Split the payment into smaller transactions, or raise the limit in the policy text
or via `[overrides] per_tx_limit` in spendguard.toml.",
        examples: ExamplePair {
            before: r#"policy: "Max $50 per transaction"
transaction: { amount: 50.01, destination: "OpenAI API" }"#,
            after: r#"policy: "Max $50 per transaction"
transaction: { amount: 50, destination: "OpenAI API" }"#,
        },
    }
}

fn explain_total_limit() -> Explanation {
    Explanation {
        title: "Total / Window Limit",
        description: "\
Caps cumulative approved spend.

Recognized phrasings:
- `$N total`
- `max $N/day`, `max $N per day`, `max $N daily` (sets a 24h window label)

When both phrasings appear, the daily one wins. The check compares the
hypothetical new total (already approved spend + this amount) against the limit.
Only approved transactions count toward the running total; the window label is
advisory and there is no automatic rollover.",
        remediation: "\
Wait for the budget owner to reset the running total (start a new session),
or raise the limit.",
        examples: ExamplePair {
            before: r#"policy: "$100 total"
already approved: 60
transaction: { amount: 60 }"#,
            after: r#"policy: "$100 total"
already approved: 60
transaction: { amount: 40 }"#,
        },
    }
}

fn explain_allowed_destinations() -> Explanation {
    Explanation {
        title: "Allowed Destinations",
        description: "\
Restricts spending to an allow-list of merchants.

Recognized phrasing: `only A and B[, C ...]`. Entries end at the next clause
keyword (`max`, `no`, `block`, `require`, `approval`) or the end of the sentence.

A destination is allowed when its lowercased name contains any lowercased entry
as a substring, so `OpenAI API` matches the entry `openai`.",
        remediation: "\
Pay one of the listed merchants, or add the merchant to the `only ...` clause.",
        examples: ExamplePair {
            before: r#"policy: "only OpenAI and Anthropic"
transaction: { destination: "Google Cloud" }"#,
            after: r#"policy: "only OpenAI, Anthropic and Google"
transaction: { destination: "Google Cloud" }"#,
        },
    }
}

fn explain_blocked_categories() -> Explanation {
    Explanation {
        title: "Blocked Categories",
        description: "\
Rejects destinations that contain a blocked term.

Recognized phrasings: `no X[, Y and Z]`, or `block X[, Y]` when no `no ...`
clause exists. Matching is case-insensitive substring containment.

The block-list is evaluated independently of the allow-list: a destination that
matches both is rejected.",
        remediation: "\
Choose a destination outside the blocked categories. Blocking always wins over
the allow-list, so adding the merchant to `only ...` does not help.",
        examples: ExamplePair {
            before: r#"policy: "only openai, no openai-gambling"
transaction: { destination: "openai-gambling" }"#,
            after: r#"policy: "only openai, no openai-gambling"
transaction: { destination: "OpenAI API" }"#,
        },
    }
}

fn explain_require_purpose() -> Explanation {
    Explanation {
        title: "Purpose Required",
        description: "\
Requires every transaction to state why it is being made.

Recognized phrasings: `require purpose`, `require reason`.
A purpose made only of whitespace counts as missing.",
        remediation: "\
Fill in the transaction's `purpose` field.",
        examples: ExamplePair {
            before: r#"policy: "require purpose"
transaction: { purpose: "   " }"#,
            after: r#"policy: "require purpose"
transaction: { purpose: "batch embedding job" }"#,
        },
    }
}

fn explain_approval_threshold() -> Explanation {
    Explanation {
        title: "Approval Threshold",
        description: "\
Escalates large transactions to a human approver.

Recognized phrasings: `approval above $N`, `approval over $N`,
`approval for amounts above $N`.

The threshold is consulted only when no other rule rejected the transaction.
Amounts strictly greater than the threshold produce `approval_required`; the
check is recorded as passed because escalation is not a failure.",
        remediation: "\
Obtain approval out of band, or keep the amount at or below the threshold.",
        examples: ExamplePair {
            before: r#"policy: "Max $50 per transaction, approval above $40"
transaction: { amount: 45 }"#,
            after: r#"policy: "Max $50 per transaction, approval above $40"
transaction: { amount: 40 }"#,
        },
    }
}

// --- Code-level explanations ---

fn explain_amount_over_limit() -> Explanation {
    let mut exp = explain_per_tx_limit();
    exp.title = "Amount Over Per-Transaction Limit";
    exp
}

fn explain_window_total_exceeded() -> Explanation {
    let mut exp = explain_total_limit();
    exp.title = "Window Total Exceeded";
    exp
}

fn explain_destination_not_allowed() -> Explanation {
    let mut exp = explain_allowed_destinations();
    exp.title = "Destination Not Allowed";
    exp
}

fn explain_destination_blocked() -> Explanation {
    let mut exp = explain_blocked_categories();
    exp.title = "Destination Blocked";
    exp
}

fn explain_purpose_missing() -> Explanation {
    let mut exp = explain_require_purpose();
    exp.title = "Purpose Missing";
    exp
}

fn explain_approval_required() -> Explanation {
    let mut exp = explain_approval_threshold();
    exp.title = "Approval Required";
    exp
}
