use serde::{Deserialize, Serialize};

use super::comment::StudentComment;

/// A teacher's document: one class, one term, one comment per student
/// section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherDocument {
    pub id: String,
    pub teacher_name: String,
    pub class_name: String,
    pub term: String,
    /// Original file path or remote file id.
    pub source_path: String,
    #[serde(default)]
    pub processed_at: Option<jiff::Timestamp>,
    #[serde(default)]
    pub comments: Vec<StudentComment>,
}

impl TeacherDocument {
    /// A copy of this document with its comments replaced.
    pub fn with_comments(&self, comments: Vec<StudentComment>) -> Self {
        Self {
            comments,
            ..self.clone()
        }
    }

    /// A copy of this document stamped as processed now.
    pub fn stamped(&self) -> Self {
        Self {
            processed_at: Some(jiff::Timestamp::now()),
            ..self.clone()
        }
    }

    pub fn total_comments(&self) -> usize {
        self.comments.len()
    }

    pub fn needs_review_count(&self) -> usize {
        self.comments.iter().filter(|c| c.needs_review).count()
    }

    pub fn total_mappings(&self) -> usize {
        self.comments
            .iter()
            .map(|c| c.anonymization_mappings.len())
            .sum()
    }
}
