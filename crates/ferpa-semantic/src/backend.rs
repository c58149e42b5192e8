use std::future::Future;

use ferpa_anonymize::gate::SafeText;
use serde::{Deserialize, Serialize};

use crate::error::SemanticError;

/// Marker in prompt templates where the comment text goes.
pub const COMMENT_SLOT: &str = "{comment_text}";

pub const DEFAULT_ANALYSIS_PROMPT: &str = "You review report-card comments written by teachers. \
Student identities have been replaced with bracketed placeholders such as [STUDENT_NAME_1]; \
keep them unchanged. Assess whether the comment below is specific, actionable and complete, \
and reply with JSON {\"is_complete\": bool, \"missing\": [string], \"summary\": string}.\n\n\
Comment:\n{comment_text}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendResponse {
    pub text: String,
    pub model: String,
}

/// An external semantic-analysis service.
///
/// Takes `&SafeText`, which only the gate can create, so unverified or
/// reviewer-restored text cannot be handed to it.
pub trait SemanticBackend: Send + Sync {
    fn name(&self) -> &str;

    fn analyze(
        &self,
        prompt: &str,
        text: &SafeText,
    ) -> impl Future<Output = Result<BackendResponse, SemanticError>> + Send;
}

/// Fill the prompt template with the gated text.
pub fn render_prompt(template: &str, text: &SafeText) -> String {
    if template.contains(COMMENT_SLOT) {
        template.replace(COMMENT_SLOT, text.as_str())
    } else {
        format!("{template}\n\n{}", text.as_str())
    }
}
