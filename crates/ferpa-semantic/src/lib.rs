//! ferpa-semantic
//!
//! The only way out to the external analysis API. [`client::EnforcedClient`]
//! takes comments, not strings, and asks the gate for their text itself;
//! backends only ever see a `SafeText`.

pub mod backend;
pub mod client;
pub mod error;
pub mod processor;
