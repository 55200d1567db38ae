#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableStatus {
    Approved,
    Rejected,
    ApprovalRequired,
}

impl RenderableStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RenderableStatus::Approved => "APPROVED",
            RenderableStatus::Rejected => "REJECTED",
            RenderableStatus::ApprovalRequired => "APPROVAL REQUIRED",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableCheck {
    pub label: String,
    pub passed: bool,
    pub escalated: bool,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableEvaluation {
    pub index: Option<u32>,
    pub amount: String,
    pub token: String,
    pub destination: String,
    pub purpose: String,
    pub status: RenderableStatus,
    pub reason: String,
    pub checks: Vec<RenderableCheck>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderableSummary {
    pub total: u32,
    pub approved: u32,
    pub rejected: u32,
    pub approval_required: u32,
    pub approved_spend: String,
    /// (rule id, count), already sorted.
    pub rejections_by_rule: Vec<(String, u32)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    /// Human-readable policy clauses.
    pub policy_lines: Vec<String>,
    pub policy_fingerprint: String,
    pub summary: RenderableSummary,
    pub entries: Vec<RenderableEvaluation>,
}
