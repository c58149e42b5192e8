use ferpa_names::normalize::{normalize_name, strip_suffix};
use ferpa_names::variants::{expand_nicknames, name_variants};

#[test]
fn apostrophes_are_removed() {
    assert_eq!(normalize_name("O'Brien"), "obrien");
    assert_eq!(normalize_name("O\u{2019}Connor"), "oconnor");
    assert_eq!(normalize_name("Michael O'Brien"), "michael obrien");
}

#[test]
fn hyphenated_parts_are_joined() {
    assert_eq!(normalize_name("Smith-Jones"), "smithjones");
    assert_eq!(normalize_name("Sarah Smith-Jones"), "sarah smithjones");
    assert_eq!(normalize_name("Mary-Kate Smith"), "marykate smith");
}

#[test]
fn mc_and_mac_prefixes_only_fold_case() {
    assert_eq!(normalize_name("McDonald"), "mcdonald");
    assert_eq!(normalize_name("MacArthur"), "macarthur");
    assert_eq!(normalize_name("  Connor   McDonald "), "connor mcdonald");
}

#[test]
fn generational_suffixes_are_stripped() {
    assert_eq!(strip_suffix("John Smith Jr."), "John Smith");
    assert_eq!(strip_suffix("John Smith Jr"), "John Smith");
    assert_eq!(strip_suffix("Robert Wilson Sr."), "Robert Wilson");
    assert_eq!(strip_suffix("William Davis III"), "William Davis");
    assert_eq!(strip_suffix("Smith, Jr."), "Smith");
}

#[test]
fn names_without_suffix_are_unchanged() {
    assert_eq!(strip_suffix("John Smith"), "John Smith");
    assert_eq!(strip_suffix("Jr"), "Jr");
}

#[test]
fn nickname_expands_to_formal_name() {
    let variants: Vec<String> = expand_nicknames("Bob Wilson")
        .iter()
        .map(|v| v.to_lowercase())
        .collect();
    assert!(variants.contains(&"bob wilson".to_string()));
    assert!(variants.contains(&"robert wilson".to_string()));

    let variants: Vec<String> = expand_nicknames("Mike O'Brien")
        .iter()
        .map(|v| v.to_lowercase())
        .collect();
    assert!(variants.contains(&"michael o'brien".to_string()));
}

#[test]
fn formal_name_expands_to_nicknames() {
    let variants = expand_nicknames("William Smith");
    assert_eq!(variants[0], "William Smith");
    assert!(variants.contains(&"Bill Smith".to_string()));
    assert!(variants.contains(&"Will Smith".to_string()));
}

#[test]
fn unknown_and_empty_names_expand_trivially() {
    assert_eq!(expand_nicknames("Zephyr Unique"), vec!["Zephyr Unique".to_string()]);
    assert!(expand_nicknames("").is_empty());
    assert!(expand_nicknames("   ").is_empty());
}

#[test]
fn name_variants_include_normalized_forms() {
    let variants = name_variants("O'Brien", true);
    assert!(variants.contains(&"O'Brien".to_string()));
    assert!(variants.contains(&"obrien".to_string()));

    let variants = name_variants("John Smith Jr.", false);
    assert!(variants.contains(&"John Smith".to_string()));
}

#[test]
fn nickname_expansion_can_be_disabled() {
    let with: Vec<String> = name_variants("Robert Smith", true);
    assert!(with.iter().any(|v| v.to_lowercase().contains("bob")));

    let without = name_variants("Robert Smith", false);
    assert_eq!(without, vec!["Robert Smith".to_string(), "robert smith".to_string()]);
    assert!(name_variants("", true).is_empty());
}
