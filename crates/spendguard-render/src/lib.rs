//! Rendering for evaluation receipts and batch reports (Markdown, terminal trace lines).

#![forbid(unsafe_code)]

mod markdown;
mod model;
mod text;

pub use markdown::{render_batch_markdown, render_evaluation_markdown};
pub use model::{
    RenderableCheck, RenderableEvaluation, RenderableReport, RenderableStatus,
    RenderableSummary,
};
pub use text::render_trace_lines;
