//! Named phrase extractors.
//!
//! Each extractor looks at the full lowercased policy text on its own and either proposes a
//! field update or nothing. Ordering and gating live in the pipeline, not here.

use super::grammar::{AMOUNT, LIST_END, parse_amount, pattern, split_list};
use crate::model::WindowKind;
use regex::Regex;
use spendguard_types::Money;
use std::collections::BTreeSet;
use std::sync::LazyLock;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldUpdate {
    PerTxLimit(Money),
    TotalLimit {
        amount: Money,
        window: Option<WindowKind>,
    },
    AllowedDestinations(BTreeSet<String>),
    BlockedCategories(BTreeSet<String>),
    ApprovalThreshold(Money),
    RequirePurpose,
}

static PER_TX: LazyLock<Regex> =
    LazyLock::new(|| pattern(&format!(r"\bmax\s*{AMOUNT}\s*per\s*(?:tx|transaction)\b")));

static TOTAL: LazyLock<Regex> = LazyLock::new(|| pattern(&format!(r"{AMOUNT}\s*total\b")));

static DAILY: LazyLock<Regex> = LazyLock::new(|| {
    pattern(&format!(
        r"\bmax\s*{AMOUNT}\s*(?:/\s*day\b|per\s*day\b|daily\b)"
    ))
});

static BARE_MAX: LazyLock<Regex> = LazyLock::new(|| pattern(&format!(r"\bmax\s*{AMOUNT}")));

static ONLY: LazyLock<Regex> = LazyLock::new(|| pattern(&format!(r"\bonly\s+(.+?){LIST_END}")));

static NO: LazyLock<Regex> = LazyLock::new(|| pattern(&format!(r"\bno\s+(.+?){LIST_END}")));

static BLOCK: LazyLock<Regex> = LazyLock::new(|| pattern(&format!(r"\bblock\s+(.+?){LIST_END}")));

static APPROVAL: LazyLock<Regex> = LazyLock::new(|| {
    pattern(&format!(
        r"\bapproval\s+(?:for\s+amounts\s+)?(?:above|over)\s*{AMOUNT}"
    ))
});

fn capture_amount(re: &Regex, text: &str) -> Option<Money> {
    let caps = re.captures(text)?;
    parse_amount(caps.get(1)?.as_str())
}

fn capture_list(re: &Regex, text: &str) -> Option<BTreeSet<String>> {
    let caps = re.captures(text)?;
    let entries = split_list(caps.get(1)?.as_str());
    (!entries.is_empty()).then_some(entries)
}

/// `max $N per tx|transaction`
pub fn per_tx_limit(text: &str) -> Option<FieldUpdate> {
    capture_amount(&PER_TX, text).map(FieldUpdate::PerTxLimit)
}

/// `$N total`
pub fn total_limit(text: &str) -> Option<FieldUpdate> {
    capture_amount(&TOTAL, text).map(|amount| FieldUpdate::TotalLimit {
        amount,
        window: None,
    })
}

/// `max $N/day`, `max $N per day`, `max $N daily`
pub fn daily_limit(text: &str) -> Option<FieldUpdate> {
    capture_amount(&DAILY, text).map(|amount| FieldUpdate::TotalLimit {
        amount,
        window: Some(WindowKind::Day24h),
    })
}

/// Bare `max $N`, read as a per-transaction limit.
pub fn fallback_max(text: &str) -> Option<FieldUpdate> {
    capture_amount(&BARE_MAX, text).map(FieldUpdate::PerTxLimit)
}

/// `only A and B[, C ...]`
pub fn allow_list(text: &str) -> Option<FieldUpdate> {
    capture_list(&ONLY, text).map(FieldUpdate::AllowedDestinations)
}

/// `no X[, and Y]`
pub fn block_list_no(text: &str) -> Option<FieldUpdate> {
    capture_list(&NO, text).map(FieldUpdate::BlockedCategories)
}

/// `block X[, and Y]`
pub fn block_list_block(text: &str) -> Option<FieldUpdate> {
    capture_list(&BLOCK, text).map(FieldUpdate::BlockedCategories)
}

/// `approval above|over $N`, `approval for amounts above|over $N`
pub fn approval_threshold(text: &str) -> Option<FieldUpdate> {
    capture_amount(&APPROVAL, text).map(FieldUpdate::ApprovalThreshold)
}

/// Literal `require purpose` or `require reason`.
pub fn require_purpose(text: &str) -> Option<FieldUpdate> {
    (text.contains("require purpose") || text.contains("require reason"))
        .then_some(FieldUpdate::RequirePurpose)
}
