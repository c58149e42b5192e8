use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::AuditError;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// The gate refused to release a comment's text.
    GateBlocked,
    /// Verified anonymized text was sent to the external API.
    ApiAuthorized,
    /// Code tried to reach the external API with text the gate did not
    /// release. Always a programming error.
    FerpaViolation,
    /// A reviewer was shown de-anonymized text.
    ReviewerRestore,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::GateBlocked => "gate_blocked",
            AuditAction::ApiAuthorized => "api_authorized",
            AuditAction::FerpaViolation => "ferpa_violation",
            AuditAction::ReviewerRestore => "reviewer_restore",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured audit event.
///
/// Emitted through `tracing` with `audit.*` fields so the subscriber's
/// JSON output doubles as the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: String,
    /// Component (or reviewer) that triggered the event.
    pub actor: String,
    pub occurred_at: jiff::Timestamp,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(
        action: AuditAction,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            action,
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            actor: actor.into(),
            occurred_at: jiff::Timestamp::now(),
            details: None,
        }
    }

    /// Shorthand for an event about a single comment.
    pub fn for_comment(action: AuditAction, comment_id: &str, actor: impl Into<String>) -> Self {
        Self::new(action, "comment", comment_id, actor)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn to_json(&self) -> Result<String, AuditError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Emit this audit event via tracing. Violations are logged at error
    /// level, blocks at warn, everything else at info.
    pub fn emit(&self) {
        let details = self
            .details
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default();

        match self.action {
            AuditAction::FerpaViolation => error!(
                audit.action = %self.action,
                audit.resource_type = %self.resource_type,
                audit.resource_id = %self.resource_id,
                audit.actor = %self.actor,
                audit.details = %details,
                "audit event: FERPA violation attempt"
            ),
            AuditAction::GateBlocked => warn!(
                audit.action = %self.action,
                audit.resource_type = %self.resource_type,
                audit.resource_id = %self.resource_id,
                audit.actor = %self.actor,
                audit.details = %details,
                "audit event"
            ),
            AuditAction::ApiAuthorized | AuditAction::ReviewerRestore => info!(
                audit.action = %self.action,
                audit.resource_type = %self.resource_type,
                audit.resource_id = %self.resource_id,
                audit.actor = %self.actor,
                audit.details = %details,
                "audit event"
            ),
        }
    }
}
