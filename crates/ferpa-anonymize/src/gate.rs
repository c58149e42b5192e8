//! The enforcement boundary in front of the external API.
//!
//! [`SafeText`] can only be constructed here, and only after the comment's
//! anonymized text has been re-scanned and found clean. Anything that
//! forwards text outside the trust boundary should accept `&SafeText`,
//! not `&str`.

use std::fmt;
use std::sync::Arc;

use ferpa_audit::events::{AuditAction, AuditEvent};
use ferpa_core::models::comment::StudentComment;
use ferpa_core::models::entity::EntityType;
use serde::Serialize;
use tracing::{debug, warn};

use crate::detector::PiiDetector;
use crate::placeholder::is_placeholder;

/// Anonymized text that passed the gate.
#[derive(Clone, PartialEq, Eq)]
pub struct SafeText {
    comment_id: String,
    text: String,
}

impl SafeText {
    pub fn comment_id(&self) -> &str {
        &self.comment_id
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Debug for SafeText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeText")
            .field("comment_id", &self.comment_id)
            .field("len", &self.text.len())
            .finish()
    }
}

impl AsRef<str> for SafeText {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockReason {
    /// Anonymization never ran, failed, or produced empty text.
    MissingAnonymizedText,
    /// The anonymized text still contains detectable PII.
    ResidualPii { entity_types: Vec<EntityType> },
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::MissingAnonymizedText => f.write_str("no anonymized text"),
            BlockReason::ResidualPii { entity_types } => {
                let types = entity_types
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "PII detected in anonymized text ({types})")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allowed(SafeText),
    Blocked(BlockReason),
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allowed(_))
    }
}

/// Re-scan a comment's anonymized text. `None` means clean.
pub(crate) fn inspect(detector: &PiiDetector, comment: &StudentComment) -> Option<BlockReason> {
    let Some(text) = comment.anonymized_text.as_deref().filter(|t| !t.trim().is_empty()) else {
        return Some(BlockReason::MissingAnonymizedText);
    };

    let mut entity_types: Vec<EntityType> = detector
        .detect(text)
        .into_iter()
        .filter(|d| !is_placeholder(&d.text))
        .map(|d| d.entity_type)
        .collect();
    if entity_types.is_empty() {
        return None;
    }
    entity_types.sort();
    entity_types.dedup();
    Some(BlockReason::ResidualPii { entity_types })
}

/// Holds the detector, never any per-comment state: every call re-verifies
/// from scratch.
#[derive(Clone)]
pub struct FerpaGate {
    detector: Arc<PiiDetector>,
}

impl FerpaGate {
    pub fn new(detector: Arc<PiiDetector>) -> Self {
        Self { detector }
    }

    /// Verify the comment and release its text only if clean. A block is
    /// logged and audited but is not an error.
    pub fn check(&self, comment: &StudentComment) -> GateDecision {
        match inspect(&self.detector, comment) {
            None => {
                debug!(comment_id = %comment.id, "api gate passed");
                GateDecision::Allowed(SafeText {
                    comment_id: comment.id.clone(),
                    text: comment.anonymized_text.clone().unwrap_or_default(),
                })
            }
            Some(reason) => {
                warn!(comment_id = %comment.id, reason = %reason, "api gate blocked");
                let details = serde_json::to_value(&reason).unwrap_or_default();
                AuditEvent::for_comment(AuditAction::GateBlocked, &comment.id, "ferpa_gate")
                    .with_details(details)
                    .emit();
                GateDecision::Blocked(reason)
            }
        }
    }

    pub fn validate_for_api(&self, comment: &StudentComment) -> bool {
        self.check(comment).is_allowed()
    }

    /// The comment's anonymized text, if and only if it passes the gate.
    /// `None` means "do not call the external API for this comment".
    pub fn get_safe_text(&self, comment: &StudentComment) -> Option<SafeText> {
        match self.check(comment) {
            GateDecision::Allowed(safe) => Some(safe),
            GateDecision::Blocked(_) => None,
        }
    }

    pub fn detector(&self) -> &Arc<PiiDetector> {
        &self.detector
    }
}
