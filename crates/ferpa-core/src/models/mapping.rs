use serde::{Deserialize, Serialize};

use super::entity::EntityType;

/// One replacement made while anonymizing a comment.
///
/// Persisted on the comment so that archived results can be restored for
/// review without the live session. The field names are the serialization
/// contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizationMapping {
    /// The surface text that was replaced.
    pub original: String,
    pub placeholder: String,
    pub entity_type: EntityType,
    /// Byte offsets in the original (pre-anonymization) text.
    pub start_pos: usize,
    pub end_pos: usize,
}
