//! Statistical entity recognition behind a single capability trait.
//!
//! The detector only ever talks to `dyn EntityRecognizer`; which engine
//! sits behind it (a remote NER service, the built-in educational
//! patterns, or a chain of both) is decided at construction time.

pub mod educational;
pub mod remote;

use ferpa_core::models::entity::EntityType;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::RecognizerError;

/// One span returned by a recognizer. Offsets are byte offsets into the
/// text that was passed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedEntity {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub entity_type: EntityType,
    pub score: f64,
}

/// A statistical or heuristic entity recognizer.
///
/// Implementations may be slow or fail; they must be safe to call
/// repeatedly and must not keep per-call state that could leak between
/// texts.
pub trait EntityRecognizer: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Find entities of the given types scoring at least `min_score`.
    fn predict_entities(
        &self,
        text: &str,
        labels: &[EntityType],
        min_score: f64,
    ) -> Result<Vec<RecognizedEntity>, RecognizerError>;
}

/// Ordered fallback over several backends: the first backend that
/// answers wins, later ones are only tried when earlier ones fail.
pub struct RecognizerChain {
    backends: Vec<Box<dyn EntityRecognizer>>,
}

impl RecognizerChain {
    pub fn new(backends: Vec<Box<dyn EntityRecognizer>>) -> Self {
        Self { backends }
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }
}

impl EntityRecognizer for RecognizerChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn predict_entities(
        &self,
        text: &str,
        labels: &[EntityType],
        min_score: f64,
    ) -> Result<Vec<RecognizedEntity>, RecognizerError> {
        let mut last_error = RecognizerError::NoBackends;
        for backend in &self.backends {
            match backend.predict_entities(text, labels, min_score) {
                Ok(entities) => return Ok(entities),
                Err(e) => {
                    warn!(
                        backend = backend.name(),
                        error = %e,
                        "recognizer backend failed, trying next"
                    );
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}
