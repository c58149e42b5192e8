use serde::{Deserialize, Serialize};

use super::mapping::AnonymizationMapping;

/// A single student comment and what the pipeline has learned about it.
///
/// Treated as a frozen record: stages never mutate a comment they were
/// handed, they build a new one with the `with_*` / `flagged_for_review`
/// helpers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentComment {
    pub id: String,
    pub document_id: String,
    /// Position of the section in the source document.
    pub section_index: usize,

    // Raw data (PII)
    pub student_name: String,
    pub grade: String,
    pub comment_text: String,

    // Safe for the external API only after the gate re-verifies it
    #[serde(default)]
    pub anonymized_text: Option<String>,
    #[serde(default)]
    pub anonymization_mappings: Vec<AnonymizationMapping>,

    #[serde(default)]
    pub needs_review: bool,
    #[serde(default)]
    pub review_reasons: Vec<String>,
}

impl StudentComment {
    pub fn new(
        id: impl Into<String>,
        document_id: impl Into<String>,
        section_index: usize,
        student_name: impl Into<String>,
        grade: impl Into<String>,
        comment_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            document_id: document_id.into(),
            section_index,
            student_name: student_name.into(),
            grade: grade.into(),
            comment_text: comment_text.into(),
            anonymized_text: None,
            anonymization_mappings: Vec::new(),
            needs_review: false,
            review_reasons: Vec::new(),
        }
    }

    /// A copy of this comment carrying the given anonymization result.
    pub fn with_anonymization(
        &self,
        anonymized_text: String,
        mappings: Vec<AnonymizationMapping>,
    ) -> Self {
        Self {
            anonymized_text: Some(anonymized_text),
            anonymization_mappings: mappings,
            ..self.clone()
        }
    }

    /// A copy of this comment with any anonymization result removed.
    pub fn without_anonymization(&self) -> Self {
        Self {
            anonymized_text: None,
            anonymization_mappings: Vec::new(),
            ..self.clone()
        }
    }

    /// A copy of this comment routed to human review. Reasons accumulate
    /// and are not duplicated.
    pub fn flagged_for_review(&self, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let mut review_reasons = self.review_reasons.clone();
        if !review_reasons.contains(&reason) {
            review_reasons.push(reason);
        }
        Self {
            needs_review: true,
            review_reasons,
            ..self.clone()
        }
    }

    /// True when anonymization has run and produced non-empty text.
    pub fn has_anonymized_text(&self) -> bool {
        self.anonymized_text
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }
}
