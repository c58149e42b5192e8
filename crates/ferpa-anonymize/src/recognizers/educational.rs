//! Pattern-based recognizer for education-specific entities.
//!
//! Always available, so it is the last backend in every chain. Catches
//! what the structured regexes do not: grade levels, school names, and
//! honorific-prefixed names of parents and guardians missing from the
//! roster.

use ferpa_core::models::entity::EntityType;
use regex::Regex;

use super::{EntityRecognizer, RecognizedEntity};
use crate::error::{AnonymizeError, RecognizerError};

const DEFAULT_SCHOOL_PATTERNS: &[&str] = &[
    r"\b\w+\s+(?:High|Elementary|Middle|Primary|Secondary)\s+School\b",
    r"\b\w+\s+(?:Academy|Institute|Preparatory)\b",
];

struct ScoredPattern {
    entity_type: EntityType,
    regex: Regex,
    score: f64,
}

pub struct EducationalRecognizer {
    patterns: Vec<ScoredPattern>,
}

impl EducationalRecognizer {
    /// Build with the default school-name patterns.
    pub fn new() -> Result<Self, AnonymizeError> {
        Self::with_school_patterns(None)
    }

    /// Build with custom school-name patterns, or the defaults for `None`.
    pub fn with_school_patterns(
        school_patterns: Option<&[String]>,
    ) -> Result<Self, AnonymizeError> {
        let mut patterns = vec![
            scored(EntityType::StudentId, r"\b[Ss]tudent[\s_-]?[Ii][Dd][:#\s]*\d{6,9}\b", 0.9)?,
            scored(EntityType::StudentId, r"\b[Ss]\d{7,9}\b", 0.7)?,
            scored(
                EntityType::GradeLevel,
                r"\b(?:1[0-2]|[1-9])(?:st|nd|rd|th)?\s*[Gg]rad(?:e|er)\b",
                0.6,
            )?,
            scored(
                EntityType::GradeLevel,
                r"\b(?:[Ff]reshman|[Ss]ophomore|[Jj]unior|[Ss]enior)\b",
                0.5,
            )?,
            scored(
                EntityType::Person,
                r"\b(?:Mr|Mrs|Ms|Miss|Mx|Dr|Prof)\.?\s+[A-Z][a-z]+(?:[-'\u{2019}][A-Z][a-z]+)?\b",
                0.6,
            )?,
        ];

        match school_patterns {
            Some(custom) => {
                for p in custom {
                    patterns.push(scored(EntityType::SchoolName, p, 0.8)?);
                }
            }
            None => {
                for p in DEFAULT_SCHOOL_PATTERNS {
                    patterns.push(scored(EntityType::SchoolName, p, 0.8)?);
                }
            }
        }

        Ok(Self { patterns })
    }
}

fn scored(
    entity_type: EntityType,
    regex: &str,
    score: f64,
) -> Result<ScoredPattern, AnonymizeError> {
    Ok(ScoredPattern {
        entity_type,
        regex: Regex::new(regex)?,
        score,
    })
}

impl EntityRecognizer for EducationalRecognizer {
    fn name(&self) -> &str {
        "educational"
    }

    fn predict_entities(
        &self,
        text: &str,
        labels: &[EntityType],
        min_score: f64,
    ) -> Result<Vec<RecognizedEntity>, RecognizerError> {
        let entities = self
            .patterns
            .iter()
            .filter(|p| labels.contains(&p.entity_type) && p.score >= min_score)
            .flat_map(|p| {
                p.regex.find_iter(text).map(move |m| RecognizedEntity {
                    text: m.as_str().to_string(),
                    start: m.start(),
                    end: m.end(),
                    entity_type: p.entity_type,
                    score: p.score,
                })
            })
            .collect();
        Ok(entities)
    }
}
