use std::sync::Arc;

use ferpa_core::models::comment::StudentComment;
use ferpa_core::models::document::TeacherDocument;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::anonymizer::PlaceholderAnonymizer;
use crate::detector::PiiDetector;
use crate::gate::{BlockReason, inspect};
use crate::placeholder::PlaceholderFormat;

pub const ANONYMIZATION_FAILED_REASON: &str = "anonymization failed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationIssue {
    pub comment_id: String,
    pub reason: BlockReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub document_id: String,
    pub is_clean: bool,
    pub issues: Vec<VerificationIssue>,
}

/// Runs detect + anonymize over whole documents, one session per
/// document, and verifies the result.
///
/// Owns its anonymizer, so concurrent documents each need their own
/// processor. The detector is shared.
pub struct AnonymizationProcessor {
    detector: Arc<PiiDetector>,
    anonymizer: PlaceholderAnonymizer,
}

impl AnonymizationProcessor {
    pub fn new(detector: Arc<PiiDetector>, format: PlaceholderFormat) -> Self {
        Self {
            detector,
            anonymizer: PlaceholderAnonymizer::new(format),
        }
    }

    pub fn detector(&self) -> &Arc<PiiDetector> {
        &self.detector
    }

    /// The live session, for restoring text while it is still in scope.
    pub fn session(&self) -> &PlaceholderAnonymizer {
        &self.anonymizer
    }

    /// Anonymize one comment within the current session.
    ///
    /// If the detections cannot be applied the comment comes back without
    /// anonymized text and flagged for review, so the gate fails closed.
    pub fn process_comment(&mut self, comment: &StudentComment) -> StudentComment {
        let detections = self.detector.detect(&comment.comment_text);

        match self.anonymizer.anonymize(&comment.comment_text, &detections) {
            Ok((anonymized_text, mappings)) => {
                debug!(
                    comment_id = %comment.id,
                    pii_count = detections.len(),
                    entities = ?detections.iter().map(|d| d.entity_type).collect::<Vec<_>>(),
                    "comment anonymized"
                );
                comment.with_anonymization(anonymized_text, mappings)
            }
            Err(e) => {
                warn!(comment_id = %comment.id, error = %e, "comment could not be anonymized");
                comment
                    .without_anonymization()
                    .flagged_for_review(ANONYMIZATION_FAILED_REASON)
            }
        }
    }

    /// Reset the session, then anonymize every comment in order.
    pub fn process_document(&mut self, document: &TeacherDocument) -> TeacherDocument {
        info!(
            document_id = %document.id,
            comment_count = document.comments.len(),
            "anonymizing document"
        );

        self.anonymizer.reset();

        let comments: Vec<StudentComment> = document
            .comments
            .iter()
            .map(|c| self.process_comment(c))
            .collect();
        let processed = document.with_comments(comments);

        info!(
            document_id = %document.id,
            total_pii_replaced = processed.total_mappings(),
            "document anonymized"
        );
        processed
    }

    /// Re-scan every comment's anonymized text for residual PII.
    pub fn verify(&self, document: &TeacherDocument) -> VerificationReport {
        let issues: Vec<VerificationIssue> = document
            .comments
            .iter()
            .filter_map(|c| {
                inspect(&self.detector, c).map(|reason| VerificationIssue {
                    comment_id: c.id.clone(),
                    reason,
                })
            })
            .collect();

        let report = VerificationReport {
            document_id: document.id.clone(),
            is_clean: issues.is_empty(),
            issues,
        };
        if report.is_clean {
            info!(document_id = %report.document_id, "anonymization verified clean");
        } else {
            warn!(
                document_id = %report.document_id,
                issues = report.issues.len(),
                "anonymization verification found issues"
            );
        }
        report
    }
}
