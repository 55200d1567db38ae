//! The `explain` use case: look up rule/code documentation.

use spendguard_types::explain::{self, Explanation};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    /// Found an explanation for the identifier.
    Found(Explanation),
    /// Unknown identifier; includes available rule ids and codes.
    NotFound {
        identifier: String,
        available_rule_ids: &'static [&'static str],
        available_codes: &'static [&'static str],
    },
}

/// Look up an explanation for a rule id or code.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_rule_ids: explain::all_rule_ids(),
            available_codes: explain::all_codes(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    out.push_str(exp.title);
    out.push('\n');
    out.push_str(&"=".repeat(exp.title.len()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\n");
    out.push_str("Remediation\n");
    out.push_str("-----------\n");
    out.push_str(exp.remediation);
    out.push_str("\n\n");
    out.push_str("Examples\n");
    out.push_str("--------\n\n");
    out.push_str("Before (trips the rule):\n");
    out.push_str("```text\n");
    out.push_str(exp.examples.before);
    out.push('\n');
    out.push_str("```\n\n");
    out.push_str("After (passes):\n");
    out.push_str("```text\n");
    out.push_str(exp.examples.after);
    out.push('\n');
    out.push_str("```\n");

    out
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(
    identifier: &str,
    rule_ids: &[&'static str],
    codes: &[&'static str],
) -> String {
    let mut out = String::new();

    out.push_str(&format!("Unknown rule id or code: {}\n\n", identifier));
    out.push_str("Available rule ids:\n");
    for id in rule_ids {
        out.push_str(&format!("  - {}\n", id));
    }
    out.push_str("\nAvailable codes:\n");
    for code in codes {
        out.push_str(&format!("  - {}\n", code));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_rule_is_found_and_formatted() {
        let ExplainOutput::Found(exp) = run_explain("spend.per_tx_limit") else {
            panic!("expected explanation");
        };
        let text = format_explanation(&exp);
        assert!(text.starts_with("Per-Transaction Limit\n====================="));
        assert!(text.contains("Remediation"));
        assert!(text.contains("Max $50 per transaction"));
    }

    #[test]
    fn codes_resolve_too() {
        assert!(matches!(
            run_explain("approval_required"),
            ExplainOutput::Found(_)
        ));
    }

    #[test]
    fn unknown_lists_alternatives() {
        let ExplainOutput::NotFound {
            identifier,
            available_rule_ids,
            available_codes,
        } = run_explain("nope")
        else {
            panic!("expected not found");
        };
        let text = format_not_found(&identifier, available_rule_ids, available_codes);
        assert!(text.contains("Unknown rule id or code: nope"));
        assert!(text.contains("  - spend.total_limit"));
        assert!(text.contains("  - destination_blocked"));
    }
}
