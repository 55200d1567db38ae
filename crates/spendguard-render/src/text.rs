use crate::RenderableCheck;

/// One line per check for terminal display.
pub fn render_trace_lines(checks: &[RenderableCheck]) -> Vec<String> {
    checks
        .iter()
        .map(|c| {
            let tag = if !c.passed {
                "FAIL"
            } else if c.escalated {
                "ESCALATE"
            } else {
                "PASS"
            };
            format!("[{tag}] {}: {}", c.label, c.detail)
        })
        .collect()
}
