use crate::{RenderableCheck, RenderableEvaluation, RenderableReport, RenderableStatus};

pub fn render_evaluation_markdown(eval: &RenderableEvaluation, policy_lines: &[String]) -> String {
    let mut out = String::new();

    out.push_str("# Spendguard evaluation\n\n");
    out.push_str(&format!(
        "- Decision: **{}**\n- Reason: {}\n- Transaction: {} to `{}`\n",
        eval.status.label(),
        eval.reason,
        amount_with_token(eval),
        eval.destination
    ));
    if !eval.purpose.trim().is_empty() {
        out.push_str(&format!("- Purpose: {}\n", eval.purpose.trim()));
    }
    out.push('\n');

    push_policy(&mut out, policy_lines);

    out.push_str("## Checks\n\n");
    push_checks(&mut out, &eval.checks);
    out
}

pub fn render_batch_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();
    let s = &report.summary;

    out.push_str("# Spendguard batch report\n\n");
    out.push_str(&format!(
        "- Transactions: {}\n- Approved spend: {}\n- Policy fingerprint: `{}`\n\n",
        s.total, s.approved_spend, report.policy_fingerprint
    ));

    push_policy(&mut out, &report.policy_lines);

    out.push_str("## Summary\n\n");
    out.push_str("| Status | Count |\n|---|---|\n");
    for (status, count) in [
        (RenderableStatus::Approved, s.approved),
        (RenderableStatus::Rejected, s.rejected),
        (RenderableStatus::ApprovalRequired, s.approval_required),
    ] {
        out.push_str(&format!("| {} | {} |\n", status.label(), count));
    }
    out.push('\n');

    if !s.rejections_by_rule.is_empty() {
        out.push_str("### Rejections by rule\n\n");
        out.push_str("| Rule | Count |\n|---|---|\n");
        for (rule, count) in &s.rejections_by_rule {
            out.push_str(&format!("| `{}` | {} |\n", rule, count));
        }
        out.push('\n');
    }

    out.push_str("## Transactions\n\n");
    if report.entries.is_empty() {
        out.push_str("No transactions.\n");
        return out;
    }

    out.push_str("| # | Amount | Destination | Status | Reason |\n|---|---|---|---|---|\n");
    for (pos, e) in report.entries.iter().enumerate() {
        let index = e.index.unwrap_or(pos as u32);
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            index,
            cell(&amount_with_token(e)),
            cell(&e.destination),
            e.status.label(),
            cell(&e.reason)
        ));
    }
    out
}

fn push_policy(out: &mut String, policy_lines: &[String]) {
    out.push_str("## Policy\n\n");
    for line in policy_lines {
        out.push_str(&format!("- {}\n", line));
    }
    out.push('\n');
}

fn push_checks(out: &mut String, checks: &[RenderableCheck]) {
    if checks.is_empty() {
        out.push_str("No checks configured.\n");
        return;
    }
    out.push_str("| Check | Result | Detail |\n|---|---|---|\n");
    for c in checks {
        let result = if !c.passed {
            "FAIL"
        } else if c.escalated {
            "ESCALATE"
        } else {
            "PASS"
        };
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            cell(&c.label),
            result,
            cell(&c.detail)
        ));
    }
}

fn amount_with_token(e: &RenderableEvaluation) -> String {
    if e.token.is_empty() {
        e.amount.clone()
    } else {
        format!("{} {}", e.amount, e.token)
    }
}

fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}
