//! ferpa-anonymize
//!
//! The anonymization gate. Detects PII with three overlapping strategies
//! (roster lookup, structured regexes, a pluggable statistical
//! recognizer), swaps each span for a stable per-document placeholder,
//! re-verifies the result, and exposes text to external callers only
//! through [`gate::FerpaGate`].
//!
//! Everything here is synchronous. One [`anonymizer::PlaceholderAnonymizer`]
//! (one session) per document; the detector is immutable and may be shared.

pub mod anonymizer;
pub mod detector;
pub mod error;
pub mod gate;
pub mod placeholder;
pub mod processor;
pub mod recognizers;
pub mod structured;
