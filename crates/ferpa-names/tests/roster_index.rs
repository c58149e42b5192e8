use ferpa_core::models::roster::{ClassRoster, RosterEntry};
use ferpa_names::roster_index::{RosterIndex, VariantKind};

fn roster(students: Vec<RosterEntry>) -> ClassRoster {
    ClassRoster {
        class_id: "hist-7".to_string(),
        class_name: "History".to_string(),
        teacher_name: "Mr. Hale".to_string(),
        term: "Spring".to_string(),
        students,
    }
}

#[test]
fn nickname_resolves_to_canonical_full_name() {
    let index =
        RosterIndex::new(&roster(vec![RosterEntry::new("S1", "William", "Smith")])).unwrap();

    let matches = index.find_matches("Bill did great work");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].text, "Bill");
    assert_eq!(matches[0].canonical, "William Smith");
    assert_eq!((matches[0].start, matches[0].end), (0, 4));
}

#[test]
fn longest_variant_wins_at_same_position() {
    let index =
        RosterIndex::new(&roster(vec![RosterEntry::new("S1", "William", "Smith")])).unwrap();

    let matches = index.find_matches("William Smith turned in every essay.");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].text, "William Smith");
}

#[test]
fn matching_is_case_insensitive_and_word_bounded() {
    let index = RosterIndex::new(&roster(vec![RosterEntry::new("S1", "Ana", "Ruiz")])).unwrap();

    let matches = index.find_matches("ANA helped; banana bread is not a name. ruiz too.");
    let texts: Vec<&str> = matches.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["ANA", "ruiz"]);
}

#[test]
fn lowercase_common_words_are_not_names() {
    let index =
        RosterIndex::new(&roster(vec![RosterEntry::new("S1", "William", "Smith")])).unwrap();

    let matches = index.find_matches("She will finish. Will is improving.");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].text, "Will");
}

#[test]
fn punctuation_variants_match() {
    let index = RosterIndex::new(&roster(vec![
        RosterEntry::new("S1", "Sean", "O'Brien"),
        RosterEntry::new("S2", "Mary-Kate", "Lee"),
    ]))
    .unwrap();

    let matches = index.find_matches("OBrien and O\u{2019}Brien; Mary Kate too.");
    assert!(matches.iter().any(|m| m.text == "OBrien" && m.student_id == "S1"));
    assert!(matches.iter().any(|m| m.text == "O\u{2019}Brien" && m.student_id == "S1"));
    assert!(matches.iter().any(|m| m.text == "Mary Kate" && m.student_id == "S2"));
}

#[test]
fn suffixes_are_optional_in_text() {
    let index =
        RosterIndex::new(&roster(vec![RosterEntry::new("S1", "Marcus", "Hill Jr.")])).unwrap();

    let matches = index.find_matches("Marcus Hill led the debate.");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].text, "Marcus Hill");
}

#[test]
fn expanded_variants_are_marked() {
    let index = RosterIndex::new(&roster(vec![RosterEntry::new("S1", "Robert", "Lane")])).unwrap();
    let pattern = &index.patterns()[0];

    assert!(pattern
        .variants
        .iter()
        .any(|v| v.text == "Bob" && v.kind == VariantKind::Expanded));
    assert!(pattern
        .variants
        .iter()
        .any(|v| v.text == "Robert Lane" && v.kind == VariantKind::Explicit));
}

#[test]
fn single_character_variants_are_skipped() {
    let index = RosterIndex::new(&roster(vec![RosterEntry::new("S1", "J", "Park")])).unwrap();

    assert!(index.patterns()[0].variants.iter().all(|v| v.text.chars().count() >= 2));
    assert!(index.find_matches("J was late").is_empty());
}

#[test]
fn find_student_resolves_nicknames() {
    let index = RosterIndex::new(&roster(vec![
        RosterEntry::new("S1", "William", "Smith"),
        RosterEntry::new("S2", "Katherine", "Moore"),
    ]))
    .unwrap();

    assert_eq!(index.find_student("katie").unwrap().student_id, "S2");
    assert_eq!(index.find_student("Smith, William").unwrap().student_id, "S1");
    assert!(index.find_student("Nobody").is_none());
}

#[test]
fn empty_roster_matches_nothing() {
    let index = RosterIndex::empty();
    assert!(index.is_empty());
    assert!(index.find_matches("William Smith").is_empty());
}
