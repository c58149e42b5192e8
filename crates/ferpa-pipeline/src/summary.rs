use ferpa_anonymize::gate::BlockReason;
use ferpa_anonymize::processor::VerificationReport;
use ferpa_core::models::document::TeacherDocument;
use serde::Serialize;
use uuid::Uuid;

/// A comment the gate refused to release, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateBlock {
    pub comment_id: String,
    pub reason: BlockReason,
}

/// Per-document outcome shown to operators. Counts, ids and entity types
/// only; no comment text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessingSummary {
    pub document_id: String,
    pub comment_count: usize,
    pub pii_replaced: usize,
    pub verification: VerificationReport,
    pub api_ready: usize,
    pub gate_blocked: usize,
    pub blocks: Vec<GateBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub document_id: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub batch_id: Uuid,
    pub started_at: jiff::Timestamp,
    pub finished_at: jiff::Timestamp,
    /// Processed documents, in input order.
    pub documents: Vec<TeacherDocument>,
    /// One summary per processed document, same order.
    pub summaries: Vec<ProcessingSummary>,
    pub failures: Vec<BatchFailure>,
}

impl BatchResult {
    pub fn total_blocked(&self) -> usize {
        self.summaries.iter().map(|s| s.gate_blocked).sum()
    }

    pub fn total_pii_replaced(&self) -> usize {
        self.summaries.iter().map(|s| s.pii_replaced).sum()
    }
}
