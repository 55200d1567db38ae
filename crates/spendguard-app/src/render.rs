//! Render use cases: Markdown and trace lines from in-memory documents.

use crate::evaluate::EvaluationDocument;
use crate::report::{SpendguardReport, renderable_evaluation, to_renderable};
use spendguard_domain::PolicyModel;
use spendguard_render::RenderableCheck;
use spendguard_types::EvaluationReceipt;

pub fn render_report_markdown(report: &SpendguardReport) -> String {
    spendguard_render::render_batch_markdown(&to_renderable(report))
}

pub fn render_evaluation_markdown(doc: &EvaluationDocument, policy: &PolicyModel) -> String {
    let eval = renderable_evaluation(None, &doc.transaction, &doc.receipt);
    spendguard_render::render_evaluation_markdown(&eval, &policy.describe())
}

pub fn render_trace(receipt: &EvaluationReceipt) -> Vec<String> {
    let checks: Vec<RenderableCheck> = receipt
        .checks
        .iter()
        .map(|c| RenderableCheck {
            label: c.label.clone(),
            passed: c.passed,
            escalated: c.escalated,
            detail: c.detail.clone(),
        })
        .collect();
    spendguard_render::render_trace_lines(&checks)
}
