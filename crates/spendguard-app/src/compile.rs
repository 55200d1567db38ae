//! The `compile` use case: policy text to a policy document.

use crate::config;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use spendguard_domain::{ExtractorId, PolicyModel, policy_fingerprint};
use spendguard_settings::Overrides;
use tracing::info;

pub const SCHEMA_POLICY_V1: &str = "spendguard.policy.v1";

#[derive(Clone, Debug)]
pub struct CompileInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    pub overrides: Overrides,
}

/// Compiled policy plus the provenance needed to audit it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyDocument {
    pub schema: String,
    pub policy_text: String,
    pub policy: PolicyModel,
    /// Extractors that fired, in pipeline order.
    pub matched: Vec<ExtractorId>,
    pub policy_fingerprint: String,
    pub summary: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct CompileOutput {
    pub document: PolicyDocument,
}

pub fn run_compile(input: CompileInput<'_>) -> anyhow::Result<CompileOutput> {
    let resolved = config::load(input.config_text, input.overrides)?;

    let policy_fingerprint = policy_fingerprint(&resolved.policy);
    info!(
        matched = resolved.matched.len(),
        fingerprint = %policy_fingerprint,
        "policy compiled"
    );

    Ok(CompileOutput {
        document: PolicyDocument {
            schema: SCHEMA_POLICY_V1.to_string(),
            summary: resolved.policy.describe(),
            policy_text: resolved.policy_text,
            policy: resolved.policy,
            matched: resolved.matched,
            policy_fingerprint,
        },
    })
}
