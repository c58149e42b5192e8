//! ferpa-pipeline
//!
//! Configuration and orchestration: builds the detector from a versioned
//! config, runs each document through anonymize → verify → gate with its
//! own session, and summarizes what operators need to see.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod summary;
