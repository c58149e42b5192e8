//! ferpa-review
//!
//! The trusted side of the boundary: turns anonymized comments back into
//! readable text for authorized reviewers. Nothing here produces a
//! `SafeText`, and the external-API crate does not depend on this one.

pub mod deanonymize;
pub mod queue;
