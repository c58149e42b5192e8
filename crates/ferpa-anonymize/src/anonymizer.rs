//! Session-scoped placeholder substitution.
//!
//! One [`PlaceholderAnonymizer`] is one session: it must be [`reset`] at
//! the start of every document and never shared between documents that
//! are processed concurrently.
//!
//! [`reset`]: PlaceholderAnonymizer::reset

use std::collections::{BTreeMap, HashMap};

use ferpa_core::models::detection::PiiDetection;
use ferpa_core::models::entity::EntityType;
use ferpa_core::models::mapping::AnonymizationMapping;
use tracing::{debug, warn};

use crate::error::AnonymizeError;
use crate::placeholder::PlaceholderFormat;

#[derive(Debug, Default)]
pub struct PlaceholderAnonymizer {
    format: PlaceholderFormat,
    counters: HashMap<EntityType, u32>,
    /// `(entity type, lowercased canonical)` → placeholder.
    forward: HashMap<(EntityType, String), String>,
    /// placeholder → surface text of its first occurrence.
    reverse: BTreeMap<String, String>,
    /// Texts this session produced, with the mappings that produced them.
    produced: HashMap<String, Vec<AnonymizationMapping>>,
}

impl PlaceholderAnonymizer {
    pub fn new(format: PlaceholderFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn format(&self) -> &PlaceholderFormat {
        &self.format
    }

    /// Forget every placeholder, counter and produced text.
    pub fn reset(&mut self) {
        self.counters.clear();
        self.forward.clear();
        self.reverse.clear();
        self.produced.clear();
    }

    /// Replace every detected span with its session placeholder.
    ///
    /// `detections` must be sorted by start and must not overlap (the
    /// detector guarantees both). Offsets in the returned mappings refer to
    /// `text`, not to the rewritten string. Nothing to replace returns the
    /// text unchanged with no mappings.
    pub fn anonymize(
        &mut self,
        text: &str,
        detections: &[PiiDetection],
    ) -> Result<(String, Vec<AnonymizationMapping>), AnonymizeError> {
        if detections.is_empty() {
            return Ok((text.to_string(), Vec::new()));
        }
        check_spans(text, detections)?;

        let mut result = text.to_string();
        let mut mappings = Vec::with_capacity(detections.len());
        let mut drift: isize = 0;

        for detection in detections {
            let original = &text[detection.start..detection.end];
            let placeholder = self.placeholder_for(detection, original);

            let start = detection.start.saturating_add_signed(drift);
            let end = detection.end.saturating_add_signed(drift);
            result.replace_range(start..end, &placeholder);
            drift += placeholder.len() as isize - detection.len() as isize;

            mappings.push(AnonymizationMapping {
                original: original.to_string(),
                placeholder,
                entity_type: detection.entity_type,
                start_pos: detection.start,
                end_pos: detection.end,
            });
        }

        debug!(
            replaced = mappings.len(),
            session_placeholders = self.reverse.len(),
            "text anonymized"
        );
        // Two inputs can anonymize to the same text; the first one keeps
        // the entry, matching the first-surface reverse map.
        self.produced
            .entry(result.clone())
            .or_insert_with(|| mappings.clone());
        Ok((result, mappings))
    }

    /// Restore placeholders to the text they replaced.
    ///
    /// A text this session produced is restored position by position, so
    /// two variants sharing one placeholder each come back as written.
    /// Any other text gets every known placeholder substituted, longest
    /// placeholder first.
    ///
    /// Lookup is by content: when two inputs produced the same text, both
    /// restore to the first input. Use the comment's own mappings with
    /// [`restore_with_mappings`] when the exact original matters.
    pub fn deanonymize(&self, text: &str) -> String {
        if let Some(mappings) = self.produced.get(text) {
            return restore_with_mappings(text, mappings);
        }
        substitute_placeholders(
            text,
            self.reverse
                .iter()
                .map(|(placeholder, original)| (placeholder.as_str(), original.as_str())),
        )
    }

    /// Every placeholder this session allocated, with the text it stands for.
    pub fn all_mappings(&self) -> BTreeMap<String, String> {
        self.reverse.clone()
    }

    pub fn placeholder_count(&self) -> usize {
        self.reverse.len()
    }

    fn placeholder_for(&mut self, detection: &PiiDetection, surface: &str) -> String {
        let key = (detection.entity_type, detection.canonical.to_lowercase());
        if let Some(existing) = self.forward.get(&key) {
            return existing.clone();
        }

        let counter = self.counters.entry(detection.entity_type).or_insert(0);
        *counter += 1;
        let placeholder = self.format.render(detection.entity_type, *counter);

        self.forward.insert(key, placeholder.clone());
        self.reverse.insert(placeholder.clone(), surface.to_string());
        placeholder
    }
}

fn check_spans(text: &str, detections: &[PiiDetection]) -> Result<(), AnonymizeError> {
    let mut previous_end = 0;
    for d in detections {
        let in_bounds = d.start <= d.end
            && d.end <= text.len()
            && text.is_char_boundary(d.start)
            && text.is_char_boundary(d.end);
        if !in_bounds {
            return Err(AnonymizeError::InvalidSpan {
                start: d.start,
                end: d.end,
                len: text.len(),
            });
        }
        if d.start < previous_end {
            return Err(AnonymizeError::OverlappingSpan {
                start: d.start,
                end: d.end,
                previous_end,
            });
        }
        previous_end = d.end;
    }
    Ok(())
}

/// Undo a recorded anonymization using its mappings.
///
/// Each mapping is replayed at its original position. A mapping whose
/// placeholder is no longer found there (the text was edited since) is
/// restored by plain substitution instead.
pub fn restore_with_mappings(text: &str, mappings: &[AnonymizationMapping]) -> String {
    let mut ordered: Vec<&AnonymizationMapping> = mappings.iter().collect();
    ordered.sort_by_key(|m| m.start_pos);

    let mut result = text.to_string();
    // Length difference left behind by mappings that could not be replayed.
    let mut shift: isize = 0;
    let mut unplaced: Vec<&AnonymizationMapping> = Vec::new();

    for mapping in ordered {
        let start = mapping.start_pos.saturating_add_signed(shift);
        let end = start + mapping.placeholder.len();
        if result.get(start..end) == Some(mapping.placeholder.as_str()) {
            result.replace_range(start..end, &mapping.original);
        } else {
            shift += mapping.placeholder.len() as isize - mapping.original.len() as isize;
            unplaced.push(mapping);
        }
    }

    if !unplaced.is_empty() {
        warn!(
            unplaced = unplaced.len(),
            "mappings no longer line up with the text, restoring by substitution"
        );
        result = substitute_placeholders(
            &result,
            unplaced
                .iter()
                .map(|m| (m.placeholder.as_str(), m.original.as_str())),
        );
    }
    result
}

/// Replace every occurrence of each placeholder, longest placeholder first
/// so `[PERSON_1]` never clobbers part of `[PERSON_12]`.
pub fn substitute_placeholders<'a>(
    text: &str,
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> String {
    let mut pairs: Vec<(&str, &str)> = pairs.into_iter().collect();
    pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));
    pairs.dedup_by(|a, b| a.0 == b.0);

    pairs
        .into_iter()
        .fold(text.to_string(), |acc, (placeholder, original)| {
            acc.replace(placeholder, original)
        })
}
