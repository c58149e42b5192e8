//! ferpa-names
//!
//! Student-name handling for roster-aware PII detection. Pure data, no
//! I/O. Normalizes names, strips suffixes, expands nicknames, and compiles
//! a roster into word-boundary matchers that resolve every variant to the
//! student's canonical full name.

pub mod error;
pub mod nicknames;
pub mod normalize;
pub mod roster_index;
pub mod variants;
