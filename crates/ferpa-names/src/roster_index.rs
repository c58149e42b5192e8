//! Roster compilation: one case-insensitive, word-bounded matcher per
//! student covering every variant of their name.

use ferpa_core::models::roster::{ClassRoster, RosterEntry};
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::NameError;
use crate::nicknames::{formal_names_for, is_common_word_name, nicknames_for};
use crate::normalize::{alternate_apostrophe, hyphen_to_space, strip_suffix, without_punctuation};
use crate::variants::title_case;

/// Variants shorter than this (in characters) are never matched.
const MIN_VARIANT_CHARS: usize = 2;

/// Where a variant came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    /// Written in, or derived by punctuation/suffix normalization from,
    /// the roster itself.
    Explicit,
    /// Added by nickname ↔ formal-name expansion.
    Expanded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameVariant {
    pub text: String,
    pub kind: VariantKind,
}

/// The compiled matcher for one student.
#[derive(Debug, Clone)]
pub struct NamePattern {
    pub student_id: String,
    /// Full registered name; every variant resolves to it.
    pub canonical: String,
    pub variants: Vec<NameVariant>,
    regex: Regex,
}

/// A roster hit in some text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterMatch {
    pub text: String,
    pub canonical: String,
    pub student_id: String,
    /// Byte offsets into the scanned text.
    pub start: usize,
    pub end: usize,
}

impl NamePattern {
    /// Build the matcher for one roster entry.
    pub fn from_entry(entry: &RosterEntry) -> Result<Self, NameError> {
        let canonical = entry.full_name();
        let variants = collect_variants(entry);

        // Longest alternative first so "William Smith" beats "William" at the
        // same position.
        let mut alternatives: Vec<&str> = variants.iter().map(|v| v.text.as_str()).collect();
        alternatives.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));

        let body = alternatives
            .iter()
            .map(|v| regex::escape(v))
            .collect::<Vec<_>>()
            .join("|");

        let regex = RegexBuilder::new(&format!(r"\b(?:{body})\b"))
            .case_insensitive(true)
            .build()
            .map_err(|source| NameError::Pattern {
                canonical: canonical.clone(),
                source,
            })?;

        Ok(Self {
            student_id: entry.student_id.clone(),
            canonical,
            variants,
            regex,
        })
    }

    /// All non-overlapping hits of this student's variants in `text`,
    /// skipping lowercase common words.
    pub fn find_iter<'t>(&'t self, text: &'t str) -> impl Iterator<Item = RosterMatch> + 't {
        self.regex
            .find_iter(text)
            .filter(|m| !is_common_word_usage(m.as_str()))
            .map(|m| RosterMatch {
                text: m.as_str().to_string(),
                canonical: self.canonical.clone(),
                student_id: self.student_id.clone(),
                start: m.start(),
                end: m.end(),
            })
    }

    /// Whether `name` is exactly one of this student's variants.
    pub fn matches_exactly(&self, name: &str) -> bool {
        let needle = name.trim().to_lowercase();
        self.variants.iter().any(|v| v.text.to_lowercase() == needle)
    }
}

/// Compiled matchers for a whole class roster, in roster order.
#[derive(Debug, Clone, Default)]
pub struct RosterIndex {
    patterns: Vec<NamePattern>,
}

impl RosterIndex {
    pub fn new(roster: &ClassRoster) -> Result<Self, NameError> {
        let patterns = roster
            .students
            .iter()
            .filter(|s| !s.full_name().trim().is_empty())
            .map(NamePattern::from_entry)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            class_id = %roster.class_id,
            students = patterns.len(),
            variants = patterns.iter().map(|p| p.variants.len()).sum::<usize>(),
            "roster index built"
        );

        Ok(Self { patterns })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn patterns(&self) -> &[NamePattern] {
        &self.patterns
    }

    /// Every roster hit in `text`, grouped by student in roster order.
    /// Hits from different students may overlap; callers resolve that.
    pub fn find_matches(&self, text: &str) -> Vec<RosterMatch> {
        self.patterns.iter().flat_map(|p| p.find_iter(text)).collect()
    }

    /// Resolve any variant (nicknames included) to its student.
    pub fn find_student(&self, name: &str) -> Option<&NamePattern> {
        self.patterns.iter().find(|p| p.matches_exactly(name))
    }
}

/// A lowercase occurrence of a word that is also a common English word
/// ("will", "grace") is not treated as a name.
fn is_common_word_usage(matched: &str) -> bool {
    let has_cased = matched.chars().any(char::is_alphabetic);
    let all_lower = !matched.chars().any(char::is_uppercase);
    has_cased && all_lower && is_common_word_name(matched)
}

fn collect_variants(entry: &RosterEntry) -> Vec<NameVariant> {
    let mut explicit: Vec<String> = Vec::new();

    for variant in entry.all_name_variants() {
        let variant = variant.trim().to_string();
        if variant.is_empty() {
            continue;
        }
        let stripped = strip_suffix(&variant);
        for form in [
            variant.clone(),
            stripped.clone(),
            hyphen_to_space(&variant),
            without_punctuation(&variant),
            without_punctuation(&stripped),
        ] {
            push_form(&mut explicit, form);
        }
        if let Some(alternate) = alternate_apostrophe(&variant) {
            push_form(&mut explicit, alternate);
        }
    }

    let last_name = strip_suffix(entry.last_name.trim());
    let mut expanded: Vec<String> = Vec::new();
    let first = entry.first_name.trim();
    let alternates = nicknames_for(first)
        .iter()
        .chain(formal_names_for(first).iter());
    for alternate in alternates {
        let alternate = title_case(alternate);
        for form in [alternate.clone(), format!("{alternate} {last_name}")] {
            let already_explicit = explicit.iter().any(|e| e.eq_ignore_ascii_case(&form));
            if !already_explicit {
                push_form(&mut expanded, form);
            }
        }
    }

    explicit
        .into_iter()
        .map(|text| NameVariant {
            text,
            kind: VariantKind::Explicit,
        })
        .chain(expanded.into_iter().map(|text| NameVariant {
            text,
            kind: VariantKind::Expanded,
        }))
        .collect()
}

fn push_form(forms: &mut Vec<String>, form: String) {
    let form = form.split_whitespace().collect::<Vec<_>>().join(" ");
    if form.chars().count() < MIN_VARIANT_CHARS {
        return;
    }
    if !forms.iter().any(|f| f.to_lowercase() == form.to_lowercase()) {
        forms.push(form);
    }
}
