//! Fixed regex detectors for structurally identifiable PII.

use std::sync::LazyLock;

use ferpa_core::models::detection::PiiDetection;
use ferpa_core::models::entity::{DetectionSource, EntityType};
use regex::Regex;

struct StructuredPattern {
    name: &'static str,
    entity_type: EntityType,
    regex: Regex,
}

fn pattern(name: &'static str, entity_type: EntityType, regex: &str) -> StructuredPattern {
    StructuredPattern {
        name,
        entity_type,
        regex: Regex::new(regex).expect("structured PII pattern is valid"),
    }
}

static PATTERNS: LazyLock<Vec<StructuredPattern>> = LazyLock::new(|| {
    vec![
        pattern(
            "email",
            EntityType::Email,
            r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
        ),
        pattern(
            "phone",
            EntityType::Phone,
            r"(?:\+?1[-.\s]?)?(?:\(\d{3}\)|\b\d{3})[-.\s]?\d{3}[-.\s]?\d{4}\b",
        ),
        pattern("ssn", EntityType::Ssn, r"\b\d{3}-\d{2}-\d{4}\b"),
        // "Student ID: 12345678", "student-id 123456789"
        pattern(
            "student_id_prefixed",
            EntityType::StudentId,
            r"\b[Ss]tudent[\s_-]?[Ii][Dd][:#\s]*\d{6,9}\b",
        ),
        // "S12345678"
        pattern("student_id_bare", EntityType::StudentId, r"\b[Ss]\d{7,9}\b"),
        pattern(
            "date_numeric",
            EntityType::Date,
            r"\b(?:0?[1-9]|1[0-2])[/-](?:0?[1-9]|[12]\d|3[01])[/-](?:\d{4}|\d{2})\b",
        ),
        pattern(
            "date_iso",
            EntityType::Date,
            r"\b\d{4}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12]\d|3[01])\b",
        ),
        pattern(
            "date_written",
            EntityType::Date,
            concat!(
                r"\b(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?",
                r"|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)",
                r"\.?\s+(?:[12]\d|3[01]|0?[1-9])(?:st|nd|rd|th)?(?:,?\s+\d{4})?\b",
            ),
        ),
    ]
});

/// Regex detector for email, phone, SSN, student ID (prefixed and bare)
/// and dates. Stateless; every pattern scans independently.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredPiiMatcher;

impl StructuredPiiMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Every match of every pattern, in pattern order. Matches of different
    /// patterns may overlap; the detector resolves that.
    pub fn scan(&self, text: &str) -> Vec<PiiDetection> {
        let confidence = DetectionSource::Regex.default_confidence().unwrap_or(0.95);
        PATTERNS
            .iter()
            .flat_map(|p| {
                p.regex.find_iter(text).map(move |m| PiiDetection {
                    text: m.as_str().to_string(),
                    canonical: m.as_str().to_string(),
                    start: m.start(),
                    end: m.end(),
                    entity_type: p.entity_type,
                    source: DetectionSource::Regex,
                    confidence,
                })
            })
            .collect()
    }

    /// Names of the compiled patterns, in scan order.
    pub fn pattern_names(&self) -> Vec<&'static str> {
        PATTERNS.iter().map(|p| p.name).collect()
    }
}
