use ferpa_anonymize::gate::GateDecision;
use ferpa_core::models::comment::StudentComment;
use ferpa_core::models::document::TeacherDocument;
use tracing::{info, warn};

use crate::backend::{DEFAULT_ANALYSIS_PROMPT, SemanticBackend};
use crate::client::{AnalysisResult, EnforcedClient};
use crate::error::SemanticError;

pub const ANALYSIS_FAILED_REASON: &str = "semantic analysis failed";

#[derive(Debug, Clone)]
pub struct SemanticOutcome {
    pub document: TeacherDocument,
    pub results: Vec<AnalysisResult>,
    pub analyzed: usize,
    pub blocked: usize,
    pub failed: usize,
}

/// Runs semantic analysis over a document, checking the gate before each
/// call and routing blocked comments to review instead.
pub struct SemanticProcessor<B> {
    client: EnforcedClient<B>,
    prompt: String,
}

impl<B: SemanticBackend> SemanticProcessor<B> {
    pub fn new(client: EnforcedClient<B>) -> Self {
        Self {
            client,
            prompt: DEFAULT_ANALYSIS_PROMPT.to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn client(&self) -> &EnforcedClient<B> {
        &self.client
    }

    /// Analyze every comment that passes the gate. Backend failures are
    /// recorded per comment; a FERPA violation aborts the document.
    pub async fn process_document(
        &self,
        document: &TeacherDocument,
    ) -> Result<SemanticOutcome, SemanticError> {
        info!(
            document_id = %document.id,
            comment_count = document.comments.len(),
            "semantic analysis started"
        );

        let mut comments: Vec<StudentComment> = Vec::with_capacity(document.comments.len());
        let mut results = Vec::new();
        let (mut blocked, mut failed) = (0, 0);

        for comment in &document.comments {
            if let GateDecision::Blocked(reason) = self.client.gate().check(comment) {
                warn!(
                    comment_id = %comment.id,
                    reason = %reason,
                    "skipping comment blocked by gate"
                );
                comments.push(comment.flagged_for_review(reason.to_string()));
                blocked += 1;
                continue;
            }

            match self.client.analyze(comment, &self.prompt).await {
                Ok(result) => {
                    results.push(result);
                    comments.push(comment.clone());
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(comment_id = %comment.id, error = %e, "semantic analysis failed");
                    comments.push(comment.flagged_for_review(ANALYSIS_FAILED_REASON));
                    failed += 1;
                }
            }
        }

        let analyzed = results.len();
        info!(
            document_id = %document.id,
            analyzed,
            blocked,
            failed,
            "semantic analysis complete"
        );

        Ok(SemanticOutcome {
            document: document.with_comments(comments),
            results,
            analyzed,
            blocked,
            failed,
        })
    }
}
