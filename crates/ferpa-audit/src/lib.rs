//! ferpa-audit
//!
//! Structured audit events for every compliance-relevant decision: gate
//! blocks, authorized API calls, attempted FERPA violations and reviewer
//! restores. Events carry identifiers and entity types only, never PII.

pub mod error;
pub mod events;
