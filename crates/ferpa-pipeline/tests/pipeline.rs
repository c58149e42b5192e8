use ferpa_anonymize::detector::{DetectorSettings, PiiDetector};
use ferpa_anonymize::error::RecognizerError;
use ferpa_anonymize::gate::{BlockReason, SafeText};
use ferpa_anonymize::recognizers::{EntityRecognizer, RecognizedEntity};
use ferpa_core::models::comment::StudentComment;
use ferpa_core::models::document::TeacherDocument;
use ferpa_core::models::entity::EntityType;
use ferpa_core::models::roster::{ClassRoster, RosterEntry};
use ferpa_pipeline::config::FerpaConfig;
use ferpa_pipeline::error::PipelineError;
use ferpa_pipeline::pipeline::FeedbackPipeline;
use ferpa_semantic::backend::{BackendResponse, SemanticBackend};
use ferpa_semantic::client::EnforcedClient;
use ferpa_semantic::error::SemanticError;
use ferpa_semantic::processor::SemanticProcessor;

fn roster() -> ClassRoster {
    ClassRoster {
        class_id: "hist-8".to_string(),
        class_name: "History 8".to_string(),
        teacher_name: "Ms. Ortiz".to_string(),
        term: "Fall".to_string(),
        students: vec![
            RosterEntry::new("S1", "William", "Smith"),
            RosterEntry::new("S2", "Maria", "Lopez"),
        ],
    }
}

fn document(id: &str, texts: &[&str]) -> TeacherDocument {
    TeacherDocument {
        id: id.to_string(),
        teacher_name: "Ms. Ortiz".to_string(),
        class_name: "History 8".to_string(),
        term: "Fall".to_string(),
        source_path: format!("fall/{id}.docx"),
        processed_at: None,
        comments: texts
            .iter()
            .enumerate()
            .map(|(i, t)| {
                StudentComment::new(format!("{id}-c{i}"), id, i, "William Smith", "A", *t)
            })
            .collect(),
    }
}

/// Tags every "Zed" as a person; panics on "PANIC".
struct TripwireRecognizer;

impl EntityRecognizer for TripwireRecognizer {
    fn name(&self) -> &str {
        "tripwire"
    }

    fn predict_entities(
        &self,
        text: &str,
        _labels: &[EntityType],
        _min_score: f64,
    ) -> Result<Vec<RecognizedEntity>, RecognizerError> {
        assert!(!text.contains("PANIC"), "recognizer crashed");
        Ok(text
            .match_indices("Zed")
            .map(|(start, m)| RecognizedEntity {
                text: m.to_string(),
                start,
                end: start + m.len(),
                entity_type: EntityType::Person,
                score: 0.9,
            })
            .collect())
    }
}

fn pipeline_with_tripwire() -> FeedbackPipeline {
    let detector =
        PiiDetector::with_recognizer(DetectorSettings::default(), Box::new(TripwireRecognizer))
            .unwrap()
            .with_roster(&roster())
            .unwrap();
    FeedbackPipeline::with_detector(FerpaConfig::default(), detector).unwrap()
}

#[test]
fn document_summary_counts_replacements() {
    let pipeline = FeedbackPipeline::new(FerpaConfig::default(), Some(&roster())).unwrap();
    let doc = document(
        "d1",
        &[
            "Bill did great work",
            "Contact parent@email.com or call 555-123-4567",
            "Great effort this term.",
        ],
    );

    let (processed, summary) = pipeline.process_document(&doc);

    assert_eq!(summary.document_id, "d1");
    assert_eq!(summary.comment_count, 3);
    assert_eq!(summary.pii_replaced, 3);
    assert_eq!(summary.api_ready, 3);
    assert_eq!(summary.gate_blocked, 0);
    assert!(summary.verification.is_clean);
    assert!(processed.processed_at.is_some());
    assert_eq!(processed.needs_review_count(), 0);
}

#[test]
fn disabled_anonymization_refuses_to_start() {
    let mut config = FerpaConfig::default();
    config.ferpa.anonymize_before_api = false;

    let result = FeedbackPipeline::new(config, None);
    assert!(matches!(result, Err(PipelineError::Config(_))));
}

#[test]
fn invalid_school_pattern_fails_detector_setup() {
    let mut config = FerpaConfig::default();
    config.detection.school_patterns = Some(vec!["(unclosed".to_string()]);

    let result = FeedbackPipeline::new(config, None);
    assert!(matches!(result, Err(PipelineError::Anonymize(_))));
}

#[test]
fn api_ready_comments_skip_blocked_ones() {
    let pipeline = FeedbackPipeline::new(FerpaConfig::default(), Some(&roster())).unwrap();
    let (processed, _) =
        pipeline.process_document(&document("d2", &["Bill did great work", "Maria helped."]));

    let raw = StudentComment::new("d2-raw", "d2", 2, "Maria Lopez", "A", "Maria helped.");
    let mixed = processed.with_comments(vec![processed.comments[0].clone(), raw]);

    let ready: Vec<(&StudentComment, SafeText)> = pipeline.api_ready_comments(&mixed);
    assert_eq!(ready.len(), 1);
    assert_eq!(ready[0].0.id, "d2-c0");
    assert_eq!(ready[0].1.as_str(), "[STUDENT_NAME_1] did great work");
}

#[test]
fn verification_catches_reintroduced_names() {
    let pipeline = FeedbackPipeline::new(FerpaConfig::default(), Some(&roster())).unwrap();
    let mut processor = pipeline.processor();

    let (processed, _) =
        pipeline.process_document_with(&mut processor, &document("d3", &["Maria helped."]));
    // Simulate a later stage that reintroduced a name.
    let tampered = processed.with_comments(vec![processed.comments[0].with_anonymization(
        "[STUDENT_NAME_1] helped William.".to_string(),
        processed.comments[0].anonymization_mappings.clone(),
    )]);
    let report = processor.verify(&tampered);
    assert!(!report.is_clean);
    assert_eq!(
        report.issues[0].reason,
        BlockReason::ResidualPii {
            entity_types: vec![EntityType::StudentName]
        }
    );
}

#[tokio::test]
async fn batch_keeps_input_order_and_isolates_sessions() {
    let pipeline = pipeline_with_tripwire();
    let documents = vec![
        document("a", &["Maria helped Zed."]),
        document("b", &["William helped."]),
        document("c", &["Maria and William argued."]),
    ];

    let result = pipeline.process_batch(documents).await;

    assert!(result.failures.is_empty());
    let ids: Vec<&str> = result.documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    let texts: Vec<&str> = result
        .documents
        .iter()
        .map(|d| d.comments[0].anonymized_text.as_deref().unwrap())
        .collect();
    assert_eq!(
        texts,
        vec![
            "[STUDENT_NAME_1] helped [PERSON_1].",
            "[STUDENT_NAME_1] helped.",
            "[STUDENT_NAME_1] and [STUDENT_NAME_2] argued.",
        ]
    );
    assert_eq!(result.summaries.len(), 3);
    assert_eq!(result.total_pii_replaced(), 5);
    assert!(result.finished_at >= result.started_at);
}

#[tokio::test]
async fn panicking_document_is_recorded_as_a_failure() {
    let pipeline = pipeline_with_tripwire();
    let documents = vec![
        document("ok-1", &["Bill did great work"]),
        document("bad", &["PANIC in the classroom"]),
        document("ok-2", &["Maria helped."]),
    ];

    let result = pipeline.process_batch(documents).await;

    let ids: Vec<&str> = result.documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["ok-1", "ok-2"]);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].document_id, "bad");
    assert!(result.failures[0].error.contains("panicked"));
    assert_eq!(result.summaries.len(), 2);
}

struct EchoBackend;

impl SemanticBackend for EchoBackend {
    fn name(&self) -> &str {
        "echo"
    }

    async fn analyze(
        &self,
        _prompt: &str,
        text: &SafeText,
    ) -> Result<BackendResponse, SemanticError> {
        Ok(BackendResponse {
            text: text.as_str().to_string(),
            model: "echo".to_string(),
        })
    }
}

#[tokio::test]
async fn semantic_stage_only_receives_processed_documents() {
    let pipeline = FeedbackPipeline::new(FerpaConfig::default(), Some(&roster())).unwrap();
    let (processed, _) =
        pipeline.process_document(&document("d4", &["Bill did great work", "Maria helped."]));

    let semantic =
        SemanticProcessor::new(EnforcedClient::new(pipeline.gate().clone(), EchoBackend));
    let outcomes = pipeline.analyze_documents(&semantic, &[processed]).await.unwrap();

    assert_eq!(outcomes.len(), 1);
    let responses: Vec<&str> = outcomes[0].results.iter().map(|r| r.response.as_str()).collect();
    assert_eq!(
        responses,
        vec!["[STUDENT_NAME_1] did great work", "[STUDENT_NAME_2] helped."]
    );
}
