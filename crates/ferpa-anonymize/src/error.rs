use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnonymizeError {
    #[error("detection span {start}..{end} is out of range or off a char boundary (len {len})")]
    InvalidSpan { start: usize, end: usize, len: usize },

    #[error("detection span {start}..{end} overlaps the previous one ending at {previous_end}")]
    OverlappingSpan {
        start: usize,
        end: usize,
        previous_end: usize,
    },

    #[error("invalid placeholder format: {0}")]
    InvalidPlaceholderFormat(String),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("roster error: {0}")]
    Roster(#[from] ferpa_names::error::NameError),

    #[error("invalid detector settings: {0}")]
    Settings(String),
}

/// Failure of a statistical entity recognizer. Never fatal to detection:
/// the detector degrades to roster + regex results.
#[derive(Debug, Error)]
pub enum RecognizerError {
    #[error("recognizer unavailable: {0}")]
    Unavailable(String),

    #[error("recognizer transport error: {0}")]
    Transport(String),

    #[error("recognizer response could not be decoded: {0}")]
    Decode(String),

    #[error("no recognizer backends configured")]
    NoBackends,
}
