use std::collections::HashMap;
use std::sync::Arc;

use ferpa_anonymize::detector::PiiDetector;
use ferpa_anonymize::gate::{FerpaGate, GateDecision, SafeText};
use ferpa_anonymize::placeholder::PlaceholderFormat;
use ferpa_anonymize::processor::AnonymizationProcessor;
use ferpa_anonymize::recognizers::educational::EducationalRecognizer;
use ferpa_anonymize::recognizers::remote::RemoteRecognizer;
use ferpa_anonymize::recognizers::{EntityRecognizer, RecognizerChain};
use ferpa_core::models::comment::StudentComment;
use ferpa_core::models::document::TeacherDocument;
use ferpa_core::models::roster::ClassRoster;
use ferpa_semantic::backend::SemanticBackend;
use ferpa_semantic::processor::{SemanticOutcome, SemanticProcessor};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::FerpaConfig;
use crate::error::PipelineError;
use crate::summary::{BatchFailure, BatchResult, GateBlock, ProcessingSummary};

/// Anonymization, verification and gating for whole documents.
///
/// Holds only shared, immutable state. Every document run gets its own
/// [`AnonymizationProcessor`], so one pipeline can serve concurrent
/// documents.
pub struct FeedbackPipeline {
    config: FerpaConfig,
    detector: Arc<PiiDetector>,
    format: PlaceholderFormat,
    gate: FerpaGate,
}

impl FeedbackPipeline {
    /// Build the detector described by `config`: remote recognizer first
    /// when configured, then the built-in educational patterns.
    pub fn new(config: FerpaConfig, roster: Option<&ClassRoster>) -> Result<Self, PipelineError> {
        config.validate()?;

        let settings = config.detector_settings();
        let detector = if settings.statistical_enabled {
            let mut backends: Vec<Box<dyn EntityRecognizer>> = Vec::new();
            if let Some(remote) = &config.detection.statistical.remote {
                backends.push(Box::new(RemoteRecognizer::new(
                    remote.endpoint.clone(),
                    remote.timeout(),
                )));
            }
            backends.push(Box::new(EducationalRecognizer::with_school_patterns(
                settings.school_patterns.as_deref(),
            )?));
            let chain = RecognizerChain::new(backends);
            info!(backends = ?chain.backend_names(), "statistical recognizers configured");
            PiiDetector::with_recognizer(settings, Box::new(chain))?
        } else {
            PiiDetector::new(settings)?
        };

        let detector = match roster {
            Some(roster) => detector.with_roster(roster)?,
            None => detector,
        };
        Self::with_detector(config, detector)
    }

    /// Use a ready-made detector (custom recognizer, preloaded roster).
    pub fn with_detector(
        config: FerpaConfig,
        detector: PiiDetector,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        let format = config.placeholder_format()?;
        let detector = Arc::new(detector);
        let gate = FerpaGate::new(detector.clone());
        Ok(Self {
            config,
            detector,
            format,
            gate,
        })
    }

    pub fn config(&self) -> &FerpaConfig {
        &self.config
    }

    pub fn detector(&self) -> &Arc<PiiDetector> {
        &self.detector
    }

    pub fn gate(&self) -> &FerpaGate {
        &self.gate
    }

    /// A processor with a fresh session over the shared detector.
    pub fn processor(&self) -> AnonymizationProcessor {
        AnonymizationProcessor::new(self.detector.clone(), self.format.clone())
    }

    /// Anonymize, verify and gate one document in a fresh session.
    pub fn process_document(
        &self,
        document: &TeacherDocument,
    ) -> (TeacherDocument, ProcessingSummary) {
        let mut processor = self.processor();
        run_document(&mut processor, &self.gate, document)
    }

    /// Like [`process_document`](Self::process_document) but with a
    /// caller-owned processor, so its session can be used for restoring
    /// text afterwards.
    pub fn process_document_with(
        &self,
        processor: &mut AnonymizationProcessor,
        document: &TeacherDocument,
    ) -> (TeacherDocument, ProcessingSummary) {
        run_document(processor, &self.gate, document)
    }

    /// Comments that pass the gate, paired with their releasable text.
    pub fn api_ready_comments<'d>(
        &self,
        document: &'d TeacherDocument,
    ) -> Vec<(&'d StudentComment, SafeText)> {
        let ready: Vec<(&StudentComment, SafeText)> = document
            .comments
            .iter()
            .filter_map(|c| self.gate.get_safe_text(c).map(|safe| (c, safe)))
            .collect();

        info!(
            document_id = %document.id,
            ready = ready.len(),
            blocked = document.comments.len() - ready.len(),
            "api ready comments selected"
        );
        ready
    }

    /// Process documents concurrently, at most `max_concurrent_documents`
    /// at a time, each on a blocking worker with its own session. A failed
    /// document is recorded and the rest of the batch continues.
    pub async fn process_batch(&self, documents: Vec<TeacherDocument>) -> BatchResult {
        let batch_id = Uuid::new_v4();
        let started_at = jiff::Timestamp::now();
        let limit = self.config.max_concurrent_documents.max(1);
        info!(batch_id = %batch_id, documents = documents.len(), limit, "batch started");

        let semaphore = Arc::new(Semaphore::new(limit));
        let mut tasks = JoinSet::new();
        // Task id -> (input index, document id). A document whose task
        // panics is only identifiable through this.
        let mut spawned: HashMap<tokio::task::Id, (usize, String)> = HashMap::new();
        let mut completed: Vec<(usize, TeacherDocument, ProcessingSummary)> = Vec::new();
        let mut failures: Vec<(usize, BatchFailure)> = Vec::new();

        for (index, document) in documents.into_iter().enumerate() {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    failures.push((
                        index,
                        BatchFailure {
                            document_id: document.id,
                            error: e.to_string(),
                        },
                    ));
                    continue;
                }
            };
            let document_id = document.id.clone();
            let detector = self.detector.clone();
            let format = self.format.clone();
            let gate = self.gate.clone();

            let handle = tasks.spawn_blocking(move || {
                let _permit = permit;
                let mut processor = AnonymizationProcessor::new(detector, format);
                let (processed, summary) = run_document(&mut processor, &gate, &document);
                (index, processed, summary)
            });
            spawned.insert(handle.id(), (index, document_id));
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, document, summary)) => completed.push((index, document, summary)),
                Err(e) => match spawned.remove(&e.id()) {
                    Some((index, document_id)) => {
                        error!(
                            batch_id = %batch_id,
                            document_id = %document_id,
                            error = %e,
                            "document failed"
                        );
                        failures.push((
                            index,
                            BatchFailure {
                                document_id,
                                error: e.to_string(),
                            },
                        ));
                    }
                    None => error!(batch_id = %batch_id, error = %e, "batch task failed"),
                },
            }
        }

        completed.sort_by_key(|(index, ..)| *index);
        failures.sort_by_key(|(index, _)| *index);
        let (documents, summaries): (Vec<_>, Vec<_>) =
            completed.into_iter().map(|(_, d, s)| (d, s)).unzip();

        let result = BatchResult {
            batch_id,
            started_at,
            finished_at: jiff::Timestamp::now(),
            documents,
            summaries,
            failures: failures.into_iter().map(|(_, f)| f).collect(),
        };
        info!(
            batch_id = %batch_id,
            processed = result.documents.len(),
            failed = result.failures.len(),
            pii_replaced = result.total_pii_replaced(),
            gate_blocked = result.total_blocked(),
            "batch finished"
        );
        result
    }

    /// Run semantic analysis over already-processed documents. Stops at the
    /// first fatal error (a FERPA violation).
    pub async fn analyze_documents<B: SemanticBackend>(
        &self,
        semantic: &SemanticProcessor<B>,
        documents: &[TeacherDocument],
    ) -> Result<Vec<SemanticOutcome>, PipelineError> {
        let mut outcomes = Vec::with_capacity(documents.len());
        for document in documents {
            match semantic.process_document(document).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    error!(document_id = %document.id, error = %e, "semantic analysis aborted");
                    return Err(e.into());
                }
            }
        }
        Ok(outcomes)
    }
}

fn run_document(
    processor: &mut AnonymizationProcessor,
    gate: &FerpaGate,
    document: &TeacherDocument,
) -> (TeacherDocument, ProcessingSummary) {
    let anonymized = processor.process_document(document);
    let verification = processor.verify(&anonymized);

    let mut blocks = Vec::new();
    let comments: Vec<StudentComment> = anonymized
        .comments
        .iter()
        .map(|c| match gate.check(c) {
            GateDecision::Allowed(_) => c.clone(),
            GateDecision::Blocked(reason) => {
                let flagged = c.flagged_for_review(reason.to_string());
                blocks.push(GateBlock {
                    comment_id: c.id.clone(),
                    reason,
                });
                flagged
            }
        })
        .collect();

    let processed = anonymized.with_comments(comments).stamped();
    let summary = ProcessingSummary {
        document_id: processed.id.clone(),
        comment_count: processed.total_comments(),
        pii_replaced: processed.total_mappings(),
        verification,
        api_ready: processed.total_comments() - blocks.len(),
        gate_blocked: blocks.len(),
        blocks,
    };

    if summary.gate_blocked > 0 {
        warn!(
            document_id = %summary.document_id,
            gate_blocked = summary.gate_blocked,
            "comments routed to human review"
        );
    }
    info!(
        document_id = %summary.document_id,
        comment_count = summary.comment_count,
        pii_replaced = summary.pii_replaced,
        api_ready = summary.api_ready,
        is_clean = summary.verification.is_clean,
        "document processed"
    );
    (processed, summary)
}
