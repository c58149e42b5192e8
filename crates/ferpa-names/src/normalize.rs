//! Punctuation and suffix normalization for personal names.

/// Apostrophe-like characters that teachers (and word processors) put in
/// names such as O'Brien.
const APOSTROPHES: &[char] = &['\'', '\u{2019}', '\u{2018}', '`', '\u{02BC}'];

/// Generational suffixes removed by [`strip_suffix`], compared lowercase
/// with trailing periods removed.
const SUFFIXES: &[&str] = &["jr", "sr", "ii", "iii", "iv"];

/// Normalize a name for comparison.
///
/// Lowercases, drops apostrophes, joins hyphenated parts, and collapses
/// whitespace: `"Sarah Smith-Jones"` → `"sarah smithjones"`,
/// `"O'Brien"` → `"obrien"`. Mc/Mac prefixes need nothing beyond case
/// folding.
pub fn normalize_name(name: &str) -> String {
    let stripped: String = name
        .chars()
        .filter(|c| !APOSTROPHES.contains(c) && *c != '-' && *c != '\u{2010}')
        .collect();

    stripped
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove trailing generational suffixes (`Jr.`, `Sr`, `III`, ...),
/// including the comma form `"Smith, Jr."`.
///
/// A name with no suffix is returned unchanged. A lone suffix token is
/// never stripped down to nothing.
pub fn strip_suffix(name: &str) -> String {
    let mut tokens: Vec<&str> = name.split_whitespace().collect();
    let mut stripped = false;

    while tokens.len() > 1 {
        let Some(last) = tokens.last() else { break };
        let bare = last.trim_matches(|c| c == '.' || c == ',').to_lowercase();
        if SUFFIXES.contains(&bare.as_str()) {
            tokens.pop();
            stripped = true;
        } else {
            break;
        }
    }

    if !stripped {
        return name.to_string();
    }

    tokens.join(" ").trim_end_matches(',').trim().to_string()
}

/// Replace hyphens with spaces: `"Smith-Jones"` → `"Smith Jones"`.
pub fn hyphen_to_space(name: &str) -> String {
    name.replace(['-', '\u{2010}'], " ")
}

/// Swap straight and curly apostrophes so either spelling in the text
/// matches the roster.
pub fn alternate_apostrophe(name: &str) -> Option<String> {
    if name.contains('\'') {
        Some(name.replace('\'', "\u{2019}"))
    } else if name.contains('\u{2019}') {
        Some(name.replace('\u{2019}', "'"))
    } else {
        None
    }
}

/// Drop apostrophes and hyphens but keep case: `"O'Brien"` → `"OBrien"`.
pub fn without_punctuation(name: &str) -> String {
    name.chars()
        .filter(|c| !APOSTROPHES.contains(c) && *c != '-' && *c != '\u{2010}')
        .collect()
}
