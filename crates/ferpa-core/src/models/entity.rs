use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The kind of PII a detection or mapping refers to.
///
/// The serialized name doubles as the placeholder prefix, so every
/// variant renders as uppercase letters and underscores only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    StudentName,
    Email,
    Phone,
    Ssn,
    StudentId,
    Date,
    Person,
    GradeLevel,
    SchoolName,
    Location,
}

impl EntityType {
    pub const ALL: [EntityType; 10] = [
        EntityType::StudentName,
        EntityType::Email,
        EntityType::Phone,
        EntityType::Ssn,
        EntityType::StudentId,
        EntityType::Date,
        EntityType::Person,
        EntityType::GradeLevel,
        EntityType::SchoolName,
        EntityType::Location,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::StudentName => "STUDENT_NAME",
            EntityType::Email => "EMAIL",
            EntityType::Phone => "PHONE",
            EntityType::Ssn => "SSN",
            EntityType::StudentId => "STUDENT_ID",
            EntityType::Date => "DATE",
            EntityType::Person => "PERSON",
            EntityType::GradeLevel => "GRADE_LEVEL",
            EntityType::SchoolName => "SCHOOL_NAME",
            EntityType::Location => "LOCATION",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = CoreError;

    /// Accepts the canonical names plus the labels common NER engines emit
    /// (`EMAIL_ADDRESS`, `PHONE_NUMBER`, lowercase `person`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        let entity = match upper.as_str() {
            "STUDENT_NAME" => EntityType::StudentName,
            "EMAIL" | "EMAIL_ADDRESS" => EntityType::Email,
            "PHONE" | "PHONE_NUMBER" => EntityType::Phone,
            "SSN" | "US_SSN" => EntityType::Ssn,
            "STUDENT_ID" => EntityType::StudentId,
            "DATE" | "DATE_TIME" => EntityType::Date,
            "PERSON" | "PER" => EntityType::Person,
            "GRADE_LEVEL" => EntityType::GradeLevel,
            "SCHOOL_NAME" | "SCHOOL" => EntityType::SchoolName,
            "LOCATION" | "LOC" | "GPE" => EntityType::Location,
            _ => return Err(CoreError::UnknownEntityType(s.to_string())),
        };
        Ok(entity)
    }
}

/// Which detection pass produced a detection.
///
/// The declaration order is the priority order: when spans overlap, an
/// earlier source wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    Roster,
    Regex,
    Statistical,
}

impl DetectionSource {
    /// Fixed confidence reported by the deterministic passes.
    pub fn default_confidence(&self) -> Option<f64> {
        match self {
            DetectionSource::Roster => Some(0.99),
            DetectionSource::Regex => Some(0.95),
            DetectionSource::Statistical => None,
        }
    }
}
