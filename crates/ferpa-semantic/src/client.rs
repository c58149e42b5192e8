use std::time::Duration;

use ferpa_anonymize::gate::FerpaGate;
use ferpa_audit::events::{AuditAction, AuditEvent};
use ferpa_core::models::comment::StudentComment;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::backend::SemanticBackend;
use crate::error::SemanticError;

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// The outcome of one authorized API call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: Uuid,
    pub comment_id: String,
    pub backend: String,
    pub model: String,
    pub response: String,
    pub analyzed_at: jiff::Timestamp,
}

/// Wraps a backend so that every call goes through the gate first.
pub struct EnforcedClient<B> {
    gate: FerpaGate,
    backend: B,
    timeout: Duration,
    log_all_api_calls: bool,
}

impl<B: SemanticBackend> EnforcedClient<B> {
    pub fn new(gate: FerpaGate, backend: B) -> Self {
        Self {
            gate,
            backend,
            timeout: DEFAULT_CALL_TIMEOUT,
            log_all_api_calls: true,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Emit an `api_authorized` audit event for every call.
    pub fn with_call_logging(mut self, enabled: bool) -> Self {
        self.log_all_api_calls = enabled;
        self
    }

    pub fn gate(&self) -> &FerpaGate {
        &self.gate
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Send one comment to the backend.
    ///
    /// A comment the gate does not release is a FERPA violation: callers
    /// are expected to have checked the gate before getting here.
    pub async fn analyze(
        &self,
        comment: &StudentComment,
        prompt: &str,
    ) -> Result<AnalysisResult, SemanticError> {
        let Some(safe_text) = self.gate.get_safe_text(comment) else {
            error!(
                comment_id = %comment.id,
                backend = self.backend.name(),
                "FERPA violation: unverified text was about to reach the external API"
            );
            AuditEvent::for_comment(AuditAction::FerpaViolation, &comment.id, "semantic_client")
                .with_details(serde_json::json!({ "backend": self.backend.name() }))
                .emit();
            return Err(SemanticError::FerpaViolation {
                comment_id: comment.id.clone(),
            });
        };

        info!(comment_id = %comment.id, backend = self.backend.name(), "api call authorized");
        if self.log_all_api_calls {
            AuditEvent::for_comment(AuditAction::ApiAuthorized, &comment.id, "semantic_client")
                .with_details(serde_json::json!({
                    "backend": self.backend.name(),
                    "text_len": safe_text.as_str().len(),
                }))
                .emit();
        }

        let response = tokio::time::timeout(self.timeout, self.backend.analyze(prompt, &safe_text))
            .await
            .map_err(|_| SemanticError::Timeout(self.timeout))??;

        info!(
            comment_id = %comment.id,
            model = %response.model,
            response_length = response.text.len(),
            "api call complete"
        );

        Ok(AnalysisResult {
            id: Uuid::new_v4(),
            comment_id: comment.id.clone(),
            backend: self.backend.name().to_string(),
            model: response.model,
            response: response.text,
            analyzed_at: jiff::Timestamp::now(),
        })
    }
}
