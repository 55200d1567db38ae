use crate::ids;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of independent check types, in evaluation order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum RuleKind {
    #[serde(rename = "spend.per_tx_limit")]
    PerTxLimit,
    #[serde(rename = "spend.total_limit")]
    TotalLimit,
    #[serde(rename = "spend.allowed_destinations")]
    AllowedDestinations,
    #[serde(rename = "spend.blocked_categories")]
    BlockedCategories,
    #[serde(rename = "spend.require_purpose")]
    RequirePurpose,
    #[serde(rename = "spend.approval_threshold")]
    ApprovalThreshold,
}

impl RuleKind {
    pub const ALL: [RuleKind; 6] = [
        RuleKind::PerTxLimit,
        RuleKind::TotalLimit,
        RuleKind::AllowedDestinations,
        RuleKind::BlockedCategories,
        RuleKind::RequirePurpose,
        RuleKind::ApprovalThreshold,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            RuleKind::PerTxLimit => ids::RULE_PER_TX_LIMIT,
            RuleKind::TotalLimit => ids::RULE_TOTAL_LIMIT,
            RuleKind::AllowedDestinations => ids::RULE_ALLOWED_DESTINATIONS,
            RuleKind::BlockedCategories => ids::RULE_BLOCKED_CATEGORIES,
            RuleKind::RequirePurpose => ids::RULE_REQUIRE_PURPOSE,
            RuleKind::ApprovalThreshold => ids::RULE_APPROVAL_THRESHOLD,
        }
    }

    /// Display label used in the evaluator's `checks[].label`.
    pub fn label(&self) -> &'static str {
        match self {
            RuleKind::PerTxLimit => "Per-transaction limit",
            RuleKind::TotalLimit => "Total limit",
            RuleKind::AllowedDestinations => "Allowed destinations",
            RuleKind::BlockedCategories => "Blocked categories",
            RuleKind::RequirePurpose => "Purpose required",
            RuleKind::ApprovalThreshold => "Approval threshold",
        }
    }

    /// Code emitted when this rule fails (or escalates, for the approval threshold).
    pub fn code(&self) -> &'static str {
        match self {
            RuleKind::PerTxLimit => ids::CODE_AMOUNT_OVER_LIMIT,
            RuleKind::TotalLimit => ids::CODE_WINDOW_TOTAL_EXCEEDED,
            RuleKind::AllowedDestinations => ids::CODE_DESTINATION_NOT_ALLOWED,
            RuleKind::BlockedCategories => ids::CODE_DESTINATION_BLOCKED,
            RuleKind::RequirePurpose => ids::CODE_PURPOSE_MISSING,
            RuleKind::ApprovalThreshold => ids::CODE_APPROVAL_REQUIRED,
        }
    }

    pub fn from_id(id: &str) -> Option<RuleKind> {
        RuleKind::ALL.into_iter().find(|k| k.id() == id)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_lookup() {
        for kind in RuleKind::ALL {
            assert_eq!(RuleKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(RuleKind::from_id("spend.unknown"), None);
    }

    #[test]
    fn serde_uses_stable_ids() {
        let json = serde_json::to_string(&RuleKind::AllowedDestinations).unwrap();
        assert_eq!(json, "\"spend.allowed_destinations\"");
    }

    #[test]
    fn ordering_follows_evaluation_order() {
        let mut sorted = RuleKind::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, RuleKind::ALL.to_vec());
    }
}
