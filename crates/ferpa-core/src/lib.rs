//! ferpa-core
//!
//! Pure domain types for the feedback anonymization pipeline.
//! No I/O and no detection logic; this is the shared vocabulary that
//! every other `ferpa-*` crate speaks.

pub mod error;
pub mod models;
