//! Composes roster, regex and statistical detection into one ranked,
//! non-overlapping, position-sorted list per text.

use ferpa_core::models::detection::PiiDetection;
use ferpa_core::models::entity::{DetectionSource, EntityType};
use ferpa_core::models::roster::ClassRoster;
use ferpa_names::roster_index::RosterIndex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::AnonymizeError;
use crate::recognizers::educational::EducationalRecognizer;
use crate::recognizers::{EntityRecognizer, RecognizedEntity};
use crate::structured::StructuredPiiMatcher;

pub const DEFAULT_MIN_SCORE: f64 = 0.3;

/// Entity types requested from the statistical recognizer by default.
/// Dates are left to the regex pass.
pub const DEFAULT_LABELS: [EntityType; 6] = [
    EntityType::Person,
    EntityType::Email,
    EntityType::Phone,
    EntityType::StudentId,
    EntityType::GradeLevel,
    EntityType::SchoolName,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorSettings {
    pub statistical_enabled: bool,
    /// Low on purpose: a missed span is a compliance failure, a false
    /// positive only over-redacts.
    pub min_score: f64,
    pub labels: Vec<EntityType>,
    /// Regexes for school names; `None` uses the built-in patterns.
    pub school_patterns: Option<Vec<String>>,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            statistical_enabled: true,
            min_score: DEFAULT_MIN_SCORE,
            labels: DEFAULT_LABELS.to_vec(),
            school_patterns: None,
        }
    }
}

impl DetectorSettings {
    pub fn validate(&self) -> Result<(), AnonymizeError> {
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(AnonymizeError::Settings(format!(
                "min_score must be between 0 and 1, got {}",
                self.min_score
            )));
        }
        Ok(())
    }
}

/// Stateless apart from its configuration and roster, so a single
/// instance can be shared (`Arc<PiiDetector>`) across documents.
pub struct PiiDetector {
    roster: RosterIndex,
    structured: StructuredPiiMatcher,
    recognizer: Option<Box<dyn EntityRecognizer>>,
    settings: DetectorSettings,
}

impl PiiDetector {
    /// Detector with the built-in educational recognizer as its
    /// statistical backend (when enabled).
    pub fn new(settings: DetectorSettings) -> Result<Self, AnonymizeError> {
        settings.validate()?;
        let recognizer: Option<Box<dyn EntityRecognizer>> = if settings.statistical_enabled {
            Some(Box::new(EducationalRecognizer::with_school_patterns(
                settings.school_patterns.as_deref(),
            )?))
        } else {
            None
        };
        Ok(Self::assemble(settings, recognizer))
    }

    /// Detector with an explicit statistical backend.
    pub fn with_recognizer(
        settings: DetectorSettings,
        recognizer: Box<dyn EntityRecognizer>,
    ) -> Result<Self, AnonymizeError> {
        settings.validate()?;
        let recognizer = settings.statistical_enabled.then_some(recognizer);
        Ok(Self::assemble(settings, recognizer))
    }

    /// Roster and regex passes only.
    pub fn without_statistical() -> Self {
        let settings = DetectorSettings {
            statistical_enabled: false,
            ..DetectorSettings::default()
        };
        Self::assemble(settings, None)
    }

    fn assemble(
        settings: DetectorSettings,
        recognizer: Option<Box<dyn EntityRecognizer>>,
    ) -> Self {
        info!(
            statistical = recognizer.as_ref().map(|r| r.name()).unwrap_or("disabled"),
            min_score = settings.min_score,
            labels = settings.labels.len(),
            "pii detector initialized"
        );
        Self {
            roster: RosterIndex::empty(),
            structured: StructuredPiiMatcher::new(),
            recognizer,
            settings,
        }
    }

    pub fn with_roster(mut self, roster: &ClassRoster) -> Result<Self, AnonymizeError> {
        self.set_roster(roster)?;
        Ok(self)
    }

    /// Replace the roster and rebuild its name patterns.
    pub fn set_roster(&mut self, roster: &ClassRoster) -> Result<(), AnonymizeError> {
        self.roster = RosterIndex::new(roster)?;
        Ok(())
    }

    pub fn roster(&self) -> &RosterIndex {
        &self.roster
    }

    pub fn settings(&self) -> &DetectorSettings {
        &self.settings
    }

    /// All PII in `text`, sorted by start offset, with no two detections
    /// overlapping. Empty or whitespace-only text yields nothing.
    ///
    /// A failing statistical backend is logged and skipped; roster and
    /// regex results are still returned.
    pub fn detect(&self, text: &str) -> Vec<PiiDetection> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut accepted = self.roster_pass(text);
        let roster_count = accepted.len();

        // Regex candidates are disjoint after resolution, so checking them
        // against roster hits alone is enough.
        let regex: Vec<PiiDetection> = resolve_overlaps(self.structured.scan(text))
            .into_iter()
            .filter(|c| !intersects_any(&accepted, c))
            .collect();
        let regex_count = regex.len();
        accepted.extend(regex);

        let statistical = self.statistical_pass(text);
        for candidate in resolve_overlaps(statistical) {
            if !intersects_any(&accepted, &candidate) {
                accepted.push(candidate);
            }
        }
        let statistical_count = accepted.len() - roster_count - regex_count;

        // Stable: equal starts keep pass order.
        accepted.sort_by_key(|d| d.start);

        debug!(
            roster = roster_count,
            regex = regex_count,
            statistical = statistical_count,
            "pii detection complete"
        );
        accepted
    }

    fn roster_pass(&self, text: &str) -> Vec<PiiDetection> {
        let confidence = DetectionSource::Roster.default_confidence().unwrap_or(0.99);
        let candidates = self
            .roster
            .find_matches(text)
            .into_iter()
            .map(|m| PiiDetection {
                text: m.text,
                canonical: m.canonical,
                start: m.start,
                end: m.end,
                entity_type: EntityType::StudentName,
                source: DetectionSource::Roster,
                confidence,
            })
            .collect();
        resolve_overlaps(candidates)
    }

    fn statistical_pass(&self, text: &str) -> Vec<PiiDetection> {
        let Some(recognizer) = &self.recognizer else {
            return Vec::new();
        };

        let labels = &self.settings.labels;
        let entities = match recognizer.predict_entities(text, labels, self.settings.min_score) {
            Ok(entities) => entities,
            Err(e) => {
                warn!(
                    backend = recognizer.name(),
                    error = %e,
                    "statistical recognizer failed, using roster and regex results only"
                );
                return Vec::new();
            }
        };

        entities
            .into_iter()
            .filter_map(|entity| to_detection(text, entity))
            .collect()
    }
}

/// Re-slices the span from `text` so the detection never carries text the
/// recognizer made up. Out-of-range or mid-character spans are dropped.
fn to_detection(text: &str, entity: RecognizedEntity) -> Option<PiiDetection> {
    let RecognizedEntity {
        start,
        end,
        entity_type,
        score,
        ..
    } = entity;

    let Some(surface) = (start < end).then(|| text.get(start..end)).flatten() else {
        warn!(
            start,
            end,
            len = text.len(),
            entity_type = %entity_type,
            "discarding recognizer span outside the text"
        );
        return None;
    };

    Some(PiiDetection {
        text: surface.to_string(),
        canonical: surface.to_string(),
        start,
        end,
        entity_type,
        source: DetectionSource::Statistical,
        confidence: score,
    })
}

fn intersects_any(accepted: &[PiiDetection], candidate: &PiiDetection) -> bool {
    accepted
        .iter()
        .any(|d| d.overlaps(candidate.start, candidate.end))
}

/// Within one pass: earliest start wins, then the longest span, then the
/// candidate produced first.
fn resolve_overlaps(candidates: Vec<PiiDetection>) -> Vec<PiiDetection> {
    let mut ordered: Vec<(usize, PiiDetection)> = candidates.into_iter().enumerate().collect();
    ordered.sort_by(|(ia, a), (ib, b)| {
        a.start
            .cmp(&b.start)
            .then(b.len().cmp(&a.len()))
            .then(ia.cmp(ib))
    });

    let mut kept: Vec<PiiDetection> = Vec::with_capacity(ordered.len());
    for (_, candidate) in ordered {
        if candidate.is_empty() {
            continue;
        }
        if kept.last().is_some_and(|last| candidate.start < last.end) {
            continue;
        }
        kept.push(candidate);
    }
    kept
}
