use ferpa_anonymize::detector::{DetectorSettings, PiiDetector};
use ferpa_anonymize::error::RecognizerError;
use ferpa_anonymize::recognizers::{EntityRecognizer, RecognizedEntity};
use ferpa_core::models::entity::{DetectionSource, EntityType};
use ferpa_core::models::roster::{ClassRoster, RosterEntry};

fn roster(students: Vec<RosterEntry>) -> ClassRoster {
    ClassRoster {
        class_id: "eng-3".to_string(),
        class_name: "English 3".to_string(),
        teacher_name: "Ms. Ortiz".to_string(),
        term: "Fall".to_string(),
        students,
    }
}

struct FailingRecognizer;

impl EntityRecognizer for FailingRecognizer {
    fn name(&self) -> &str {
        "failing"
    }

    fn predict_entities(
        &self,
        _text: &str,
        _labels: &[EntityType],
        _min_score: f64,
    ) -> Result<Vec<RecognizedEntity>, RecognizerError> {
        Err(RecognizerError::Unavailable("model not loaded".to_string()))
    }
}

struct FixedRecognizer(Vec<RecognizedEntity>);

impl EntityRecognizer for FixedRecognizer {
    fn name(&self) -> &str {
        "fixed"
    }

    fn predict_entities(
        &self,
        _text: &str,
        _labels: &[EntityType],
        _min_score: f64,
    ) -> Result<Vec<RecognizedEntity>, RecognizerError> {
        Ok(self.0.clone())
    }
}

fn person(start: usize, end: usize, text: &str) -> RecognizedEntity {
    RecognizedEntity {
        text: text.to_string(),
        start,
        end,
        entity_type: EntityType::Person,
        score: 0.85,
    }
}

#[test]
fn empty_and_whitespace_text_yield_nothing() {
    let detector = PiiDetector::new(DetectorSettings::default()).unwrap();
    assert!(detector.detect("").is_empty());
    assert!(detector.detect("   \n\t").is_empty());
}

#[test]
fn text_without_pii_yields_nothing() {
    let detector = PiiDetector::new(DetectorSettings::default()).unwrap();
    assert!(detector.detect("Great effort this term.").is_empty());
}

#[test]
fn nickname_is_detected_with_canonical_identity() {
    let detector = PiiDetector::new(DetectorSettings::default())
        .unwrap()
        .with_roster(&roster(vec![RosterEntry::new("S1", "William", "Smith")]))
        .unwrap();

    let detections = detector.detect("Bill did great work");
    assert_eq!(detections.len(), 1);
    let d = &detections[0];
    assert_eq!(d.text, "Bill");
    assert_eq!(d.canonical, "William Smith");
    assert_eq!(d.entity_type, EntityType::StudentName);
    assert_eq!(d.source, DetectionSource::Roster);
    assert_eq!(d.confidence, 0.99);
    assert_eq!((d.start, d.end), (0, 4));
}

#[test]
fn structured_pii_is_sorted_by_position() {
    let detector = PiiDetector::without_statistical();

    let detections = detector.detect("Call 555-123-4567 or email parent@email.com");
    let types: Vec<EntityType> = detections.iter().map(|d| d.entity_type).collect();
    assert_eq!(types, vec![EntityType::Phone, EntityType::Email]);
    assert!(detections.iter().all(|d| d.source == DetectionSource::Regex));
    assert!(detections.iter().all(|d| d.confidence == 0.95));
    assert!(detections[0].start < detections[1].start);
}

#[test]
fn prefixed_student_id_is_one_detection() {
    let detector = PiiDetector::without_statistical();

    let detections = detector.detect("Student ID: 12345678 was missing.");
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].entity_type, EntityType::StudentId);
    assert_eq!(detections[0].text, "Student ID: 12345678");
}

#[test]
fn roster_beats_overlapping_regex_match() {
    let detector = PiiDetector::without_statistical()
        .with_roster(&roster(vec![RosterEntry::new("S1", "April", "Jones")]))
        .unwrap();

    let detections = detector.detect("April 3rd was a turning point.");
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].text, "April");
    assert_eq!(detections[0].source, DetectionSource::Roster);
}

#[test]
fn statistical_span_overlapping_roster_is_suppressed() {
    let text = "William Smith spoke up.";
    let detector = PiiDetector::with_recognizer(
        DetectorSettings::default(),
        Box::new(FixedRecognizer(vec![person(0, 7, "William")])),
    )
    .unwrap()
    .with_roster(&roster(vec![RosterEntry::new("S1", "William", "Smith")]))
    .unwrap();

    let detections = detector.detect(text);
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].source, DetectionSource::Roster);
    assert_eq!(detections[0].text, "William Smith");
}

// A one-byte intersection suppresses the whole statistical span, including
// "Coach Diaz", which nothing else catches.
#[test]
fn one_byte_overlap_suppresses_entire_statistical_span() {
    let text = "Ana, Coach Diaz said";
    let detector = PiiDetector::with_recognizer(
        DetectorSettings::default(),
        Box::new(FixedRecognizer(vec![person(2, 15, "a, Coach Diaz")])),
    )
    .unwrap()
    .with_roster(&roster(vec![RosterEntry::new("S1", "Ana", "Ruiz")]))
    .unwrap();

    let detections = detector.detect(text);
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].text, "Ana");
}

#[test]
fn non_overlapping_statistical_span_is_accepted() {
    let text = "Ana and her aunt Rosa visited.";
    let detector = PiiDetector::with_recognizer(
        DetectorSettings::default(),
        Box::new(FixedRecognizer(vec![person(17, 21, "Rosa")])),
    )
    .unwrap()
    .with_roster(&roster(vec![RosterEntry::new("S1", "Ana", "Ruiz")]))
    .unwrap();

    let detections = detector.detect(text);
    assert_eq!(detections.len(), 2);
    assert_eq!(detections[1].text, "Rosa");
    assert_eq!(detections[1].source, DetectionSource::Statistical);
    assert_eq!(detections[1].confidence, 0.85);
}

#[test]
fn recognizer_spans_outside_the_text_are_dropped() {
    let text = "Zoë helped Rosa";
    let detector = PiiDetector::with_recognizer(
        DetectorSettings::default(),
        Box::new(FixedRecognizer(vec![
            person(11, 400, "Rosa"),
            // Inside the two-byte "ë".
            person(0, 3, "Zo"),
        ])),
    )
    .unwrap();

    assert!(detector.detect(text).is_empty());
}

#[test]
fn recognizer_failure_degrades_to_roster_and_regex() {
    let detector = PiiDetector::with_recognizer(
        DetectorSettings::default(),
        Box::new(FailingRecognizer),
    )
    .unwrap()
    .with_roster(&roster(vec![RosterEntry::new("S1", "William", "Smith")]))
    .unwrap();

    let detections = detector.detect("Bill's mother (mom@example.com) called.");
    let types: Vec<EntityType> = detections.iter().map(|d| d.entity_type).collect();
    assert_eq!(types, vec![EntityType::StudentName, EntityType::Email]);
}

#[test]
fn educational_recognizer_catches_guardians_and_schools() {
    let detector = PiiDetector::new(DetectorSettings::default()).unwrap();

    let detections = detector.detect("Mrs. Johnson says Lincoln High School was easier.");
    let types: Vec<EntityType> = detections.iter().map(|d| d.entity_type).collect();
    assert_eq!(types, vec![EntityType::Person, EntityType::SchoolName]);
    assert!(detections.iter().all(|d| d.source == DetectionSource::Statistical));
}

#[test]
fn statistical_pass_can_be_disabled() {
    let settings = DetectorSettings {
        statistical_enabled: false,
        ..DetectorSettings::default()
    };
    let detector = PiiDetector::new(settings).unwrap();

    assert!(detector.detect("Mrs. Johnson came by.").is_empty());
}

#[test]
fn out_of_range_min_score_is_rejected() {
    let settings = DetectorSettings {
        min_score: 1.5,
        ..DetectorSettings::default()
    };
    assert!(PiiDetector::new(settings).is_err());
}

#[test]
fn byte_offsets_respect_multibyte_text() {
    let detector = PiiDetector::without_statistical()
        .with_roster(&roster(vec![RosterEntry::new("S1", "Zoë", "Ng")]))
        .unwrap();

    let text = "Great job, Zoë!";
    let detections = detector.detect(text);
    assert_eq!(detections.len(), 1);
    assert_eq!((detections[0].start, detections[0].end), (11, 15));
    assert_eq!(&text[detections[0].start..detections[0].end], "Zoë");
}
