use thiserror::Error;

#[derive(Debug, Error)]
pub enum SemanticError {
    /// Text that did not pass the gate was about to leave the trust
    /// boundary. Indicates a bug in the caller, never a data condition.
    #[error("FERPA violation: comment {comment_id} reached the API without passing the gate")]
    FerpaViolation { comment_id: String },

    #[error("backend call failed: {0}")]
    Backend(String),

    #[error("backend call timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl SemanticError {
    /// Fatal errors abort the whole batch; everything else is recorded
    /// against the single comment.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SemanticError::FerpaViolation { .. })
    }
}
