//! Free text -> `PolicyModel`.
//!
//! Compilation is total: unrecognized or partially recognized text degrades to a weaker policy,
//! never to an error. Extraction runs a fixed, ordered pipeline of named extractors over the
//! lowercased input. Extractors are independent; the pipeline decides which ones may run and in
//! which order their updates land.

mod extractors;
mod grammar;

use crate::model::PolicyModel;
use extractors::FieldUpdate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorId {
    PerTxLimit,
    TotalLimit,
    DailyLimit,
    FallbackMax,
    AllowList,
    BlockListNo,
    BlockListBlock,
    ApprovalThreshold,
    RequirePurpose,
}

impl ExtractorId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractorId::PerTxLimit => "per_tx_limit",
            ExtractorId::TotalLimit => "total_limit",
            ExtractorId::DailyLimit => "daily_limit",
            ExtractorId::FallbackMax => "fallback_max",
            ExtractorId::AllowList => "allow_list",
            ExtractorId::BlockListNo => "block_list_no",
            ExtractorId::BlockListBlock => "block_list_block",
            ExtractorId::ApprovalThreshold => "approval_threshold",
            ExtractorId::RequirePurpose => "require_purpose",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOutput {
    pub policy: PolicyModel,
    /// Extractors that fired, in pipeline order.
    pub matched: Vec<ExtractorId>,
}

/// When a stage is allowed to run.
#[derive(Clone, Copy, Debug)]
enum Gate {
    Always,
    /// Only if no per-transaction or total limit has been extracted so far.
    NoLimitYet,
    /// Only if the named stage did not fire.
    Unless(ExtractorId),
}

struct Stage {
    id: ExtractorId,
    gate: Gate,
    extract: fn(&str) -> Option<FieldUpdate>,
}

// Order is load-bearing: daily overwrites total, fallback looks at both, `block` yields to `no`.
const PIPELINE: &[Stage] = &[
    Stage {
        id: ExtractorId::PerTxLimit,
        gate: Gate::Always,
        extract: extractors::per_tx_limit,
    },
    Stage {
        id: ExtractorId::TotalLimit,
        gate: Gate::Always,
        extract: extractors::total_limit,
    },
    Stage {
        id: ExtractorId::DailyLimit,
        gate: Gate::Always,
        extract: extractors::daily_limit,
    },
    Stage {
        id: ExtractorId::FallbackMax,
        gate: Gate::NoLimitYet,
        extract: extractors::fallback_max,
    },
    Stage {
        id: ExtractorId::AllowList,
        gate: Gate::Always,
        extract: extractors::allow_list,
    },
    Stage {
        id: ExtractorId::BlockListNo,
        gate: Gate::Always,
        extract: extractors::block_list_no,
    },
    Stage {
        id: ExtractorId::BlockListBlock,
        gate: Gate::Unless(ExtractorId::BlockListNo),
        extract: extractors::block_list_block,
    },
    Stage {
        id: ExtractorId::ApprovalThreshold,
        gate: Gate::Always,
        extract: extractors::approval_threshold,
    },
    Stage {
        id: ExtractorId::RequirePurpose,
        gate: Gate::Always,
        extract: extractors::require_purpose,
    },
];

/// Compile policy text. Never fails; the empty string yields the no-op policy.
pub fn compile(text: &str) -> PolicyModel {
    compile_traced(text).policy
}

/// Compile policy text and report which extractors fired.
pub fn compile_traced(text: &str) -> CompileOutput {
    let lowered = text.to_lowercase();
    let mut policy = PolicyModel::default();
    let mut matched = Vec::new();

    for stage in PIPELINE {
        let open = match stage.gate {
            Gate::Always => true,
            Gate::NoLimitYet => policy.per_tx_limit.is_none() && policy.total_limit.is_none(),
            Gate::Unless(other) => !matched.contains(&other),
        };
        if !open {
            continue;
        }
        if let Some(update) = (stage.extract)(&lowered) {
            debug!(extractor = stage.id.as_str(), ?update, "policy extractor matched");
            apply(&mut policy, update);
            matched.push(stage.id);
        }
    }

    CompileOutput { policy, matched }
}

fn apply(policy: &mut PolicyModel, update: FieldUpdate) {
    match update {
        FieldUpdate::PerTxLimit(amount) => policy.per_tx_limit = Some(amount),
        FieldUpdate::TotalLimit { amount, window } => {
            policy.total_limit = Some(amount);
            policy.time_window = window;
        }
        FieldUpdate::AllowedDestinations(entries) => policy.allowed_destinations = entries,
        FieldUpdate::BlockedCategories(entries) => policy.blocked_categories = entries,
        FieldUpdate::ApprovalThreshold(amount) => policy.approval_threshold = Some(amount),
        FieldUpdate::RequirePurpose => policy.require_purpose = true,
    }
}
