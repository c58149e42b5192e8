//! HTTP-backed entity recognizer.
//!
//! Posts `{text, labels, threshold}` to a NER service and expects a JSON
//! list of `{text, start, end, entity_type, score}` back. Any failure is a
//! [`RecognizerError`]; the detector treats that as "unavailable".

use std::time::Duration;

use ferpa_core::models::entity::EntityType;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{EntityRecognizer, RecognizedEntity};
use crate::error::RecognizerError;

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    text: &'a str,
    labels: Vec<&'static str>,
    threshold: f64,
}

#[derive(Debug, Deserialize)]
struct PredictedSpan {
    text: String,
    start: usize,
    end: usize,
    entity_type: String,
    score: f64,
}

pub struct RemoteRecognizer {
    endpoint: String,
    agent: ureq::Agent,
}

impl RemoteRecognizer {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            endpoint: endpoint.into(),
            agent,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl EntityRecognizer for RemoteRecognizer {
    fn name(&self) -> &str {
        "remote"
    }

    fn predict_entities(
        &self,
        text: &str,
        labels: &[EntityType],
        min_score: f64,
    ) -> Result<Vec<RecognizedEntity>, RecognizerError> {
        let request = PredictRequest {
            text,
            labels: labels.iter().map(|l| l.as_str()).collect(),
            threshold: min_score,
        };
        let body =
            serde_json::to_string(&request).map_err(|e| RecognizerError::Decode(e.to_string()))?;

        let mut response = self
            .agent
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .send(&body)
            .map_err(|e| match e {
                ureq::Error::StatusCode(status) => {
                    RecognizerError::Unavailable(format!("service returned HTTP {status}"))
                }
                other => RecognizerError::Transport(other.to_string()),
            })?;

        let raw = response
            .body_mut()
            .read_to_string()
            .map_err(|e| RecognizerError::Transport(e.to_string()))?;
        let spans: Vec<PredictedSpan> =
            serde_json::from_str(&raw).map_err(|e| RecognizerError::Decode(e.to_string()))?;

        let returned = spans.len();
        let entities: Vec<RecognizedEntity> = spans
            .into_iter()
            .filter(|s| s.score >= min_score)
            .filter_map(|s| {
                let entity_type = s.entity_type.parse::<EntityType>().ok()?;
                labels.contains(&entity_type).then_some(RecognizedEntity {
                    text: s.text,
                    start: s.start,
                    end: s.end,
                    entity_type,
                    score: s.score,
                })
            })
            .collect();

        debug!(
            returned,
            accepted = entities.len(),
            "remote recognizer responded"
        );
        Ok(entities)
    }
}
