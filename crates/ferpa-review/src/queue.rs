use ferpa_audit::events::{AuditAction, AuditEvent};
use ferpa_core::models::document::TeacherDocument;
use serde::Serialize;
use tracing::info;

use crate::deanonymize::DeAnonymizer;

/// One comment awaiting a human decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewItem {
    pub comment_id: String,
    pub student_name: String,
    pub restored_text: String,
    pub anonymized_text: Option<String>,
    pub reasons: Vec<String>,
}

/// Every comment flagged `needs_review`, restored for display. Each
/// restore is audited against `reviewer`.
pub fn build_review_queue(
    document: &TeacherDocument,
    deanonymizer: &DeAnonymizer<'_>,
    reviewer: &str,
) -> Vec<ReviewItem> {
    let items: Vec<ReviewItem> = document
        .comments
        .iter()
        .filter(|c| c.needs_review)
        .map(|c| {
            let restored = deanonymizer.restore(c);
            AuditEvent::for_comment(AuditAction::ReviewerRestore, &c.id, reviewer)
                .with_details(serde_json::json!({
                    "document_id": document.id,
                    "source": format!("{:?}", deanonymizer.source_for(c)),
                }))
                .emit();
            ReviewItem {
                comment_id: c.id.clone(),
                student_name: c.student_name.clone(),
                restored_text: restored.into_string(),
                anonymized_text: c.anonymized_text.clone(),
                reasons: c.review_reasons.clone(),
            }
        })
        .collect();

    info!(
        document_id = %document.id,
        queued = items.len(),
        "review queue built"
    );
    items
}
