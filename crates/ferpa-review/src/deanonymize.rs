use std::fmt;

use ferpa_anonymize::anonymizer::{PlaceholderAnonymizer, restore_with_mappings};
use ferpa_core::models::comment::StudentComment;
use tracing::debug;

/// De-anonymized comment text, for reviewer display only.
///
/// Deliberately not convertible into anything the external-API client
/// accepts.
#[derive(Clone, PartialEq, Eq)]
pub struct RestoredText {
    comment_id: String,
    text: String,
}

impl RestoredText {
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

// Keep PII out of debug logs.
impl fmt::Debug for RestoredText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestoredText")
            .field("comment_id", &self.comment_id)
            .field("len", &self.text.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreSource {
    Unanonymized,
    Session,
    PersistedMappings,
}

/// Restores comments from the mappings persisted on each comment. The live
/// session, when one is in scope, only covers comments that carry no
/// mappings; it looks texts up by content and cannot tell apart two
/// comments that anonymized to the same string.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeAnonymizer<'s> {
    session: Option<&'s PlaceholderAnonymizer>,
}

impl<'s> DeAnonymizer<'s> {
    /// Restore from persisted mappings only.
    pub fn new() -> Self {
        Self { session: None }
    }

    pub fn with_session(session: &'s PlaceholderAnonymizer) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn restore(&self, comment: &StudentComment) -> RestoredText {
        let (text, source) = self.restore_with_source(comment);
        debug!(comment_id = %comment.id, source = ?source, "comment restored for review");
        RestoredText {
            comment_id: comment.id.clone(),
            text,
        }
    }

    fn restore_with_source(&self, comment: &StudentComment) -> (String, RestoreSource) {
        let Some(anonymized) = comment.anonymized_text.as_deref() else {
            return (comment.comment_text.clone(), RestoreSource::Unanonymized);
        };

        match (self.session, self.source_for(comment)) {
            (Some(session), RestoreSource::Session) => {
                (session.deanonymize(anonymized), RestoreSource::Session)
            }
            (_, source) => (
                restore_with_mappings(anonymized, &comment.anonymization_mappings),
                source,
            ),
        }
    }

    /// Which path [`restore`](Self::restore) would take for this comment.
    pub fn source_for(&self, comment: &StudentComment) -> RestoreSource {
        match (&comment.anonymized_text, self.session) {
            (None, _) => RestoreSource::Unanonymized,
            (Some(_), Some(_)) if comment.anonymization_mappings.is_empty() => {
                RestoreSource::Session
            }
            (Some(_), _) => RestoreSource::PersistedMappings,
        }
    }
}
