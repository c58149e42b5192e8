use serde::{Deserialize, Serialize};

use super::entity::{DetectionSource, EntityType};

/// A single PII span found in a text. Transient: recomputed per scan and
/// never cached across texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiiDetection {
    /// The matched substring, exactly as it appears in the text.
    pub text: String,
    /// Resolved identity. For roster hits this is the student's full name
    /// regardless of which variant matched; otherwise the matched text.
    pub canonical: String,
    /// Byte offset of the first matched byte.
    pub start: usize,
    /// Byte offset one past the last matched byte.
    pub end: usize,
    pub entity_type: EntityType,
    pub source: DetectionSource,
    pub confidence: f64,
}

impl PiiDetection {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Any interval intersection counts as an overlap.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}
