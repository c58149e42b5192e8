use crate::nicknames::{formal_names_for, nicknames_for};
use crate::normalize::{normalize_name, strip_suffix};

/// Capitalize the first character of a lowercase table entry.
pub(crate) fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Expand a name through the nickname tables.
///
/// Returns the original name first, then one variant per nickname (when
/// the first token is a formal name) or per formal name (when the first
/// token is a nickname), keeping the remaining tokens:
/// `"Bob Wilson"` → `["Bob Wilson", "Robert Wilson"]`.
pub fn expand_nicknames(name: &str) -> Vec<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut variants = vec![trimmed.to_string()];
    let (first, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, Some(rest.trim_start())),
        None => (trimmed, None),
    };

    let alternates = nicknames_for(first)
        .iter()
        .chain(formal_names_for(first).iter());

    for alternate in alternates {
        let swapped = match rest {
            Some(rest) => format!("{} {rest}", title_case(alternate)),
            None => title_case(alternate),
        };
        push_unique(&mut variants, swapped);
    }

    variants
}

/// Every form a name may take: the original, its normalized form, its
/// suffix-stripped form, and optionally its nickname expansions.
/// Deduplicated in first-seen order.
pub fn name_variants(name: &str, include_nicknames: bool) -> Vec<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut variants = Vec::new();
    push_unique(&mut variants, trimmed.to_string());
    push_unique(&mut variants, normalize_name(trimmed));

    let without_suffix = strip_suffix(trimmed);
    push_unique(&mut variants, normalize_name(&without_suffix));
    push_unique(&mut variants, without_suffix.clone());

    if include_nicknames {
        for expanded in expand_nicknames(&without_suffix) {
            push_unique(&mut variants, normalize_name(&expanded));
            push_unique(&mut variants, expanded);
        }
    }

    variants
}

fn push_unique(variants: &mut Vec<String>, candidate: String) {
    if !candidate.is_empty() && !variants.contains(&candidate) {
        variants.push(candidate);
    }
}
