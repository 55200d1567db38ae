//! Shared lexical pieces for the policy extractors.

use regex::Regex;
use spendguard_types::Money;
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::LazyLock;

/// Optional `$`, then either a comma-grouped or a plain integer, then an optional fraction.
pub const AMOUNT: &str = r"\$?\s*(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)";

/// Where a merchant/category list ends: a clause keyword (with any `, and` before it),
/// sentence punctuation, or end of text.
pub const LIST_END: &str =
    r"(?:[\s,]+(?:and\s+)?(?:max|only|no|block|require|approval)\b|[;!?\n]|\.(?:\s|$)|$)";

static LIST_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*,\s*(?:and\s+)?|\s+and\s+").expect("list separator pattern is valid")
});

static DANGLING_AND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:and\b\s*)+|(?:\s*\band)+$").expect("connective pattern is valid")
});

/// Build a case-sensitive pattern; inputs are lowercased before matching.
pub fn pattern(src: &str) -> Regex {
    Regex::new(src).expect("extractor patterns are compile-time constants")
}

/// Parse a captured amount. Out-of-range values count as "no match".
pub fn parse_amount(raw: &str) -> Option<Money> {
    let digits: String = raw.chars().filter(|c| *c != ',').collect();
    rust_decimal::Decimal::from_str(&digits).ok().map(Money::new)
}

/// Split `a, b and c` into trimmed, non-empty entries.
pub fn split_list(raw: &str) -> BTreeSet<String> {
    LIST_SEPARATOR
        .split(raw)
        .map(|entry| {
            entry
                .trim()
                .trim_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | '"' | '\''))
                .trim()
        })
        .map(|entry| DANGLING_AND.replace_all(entry, "").trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}
