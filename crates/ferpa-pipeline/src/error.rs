use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config_version {found} is newer than this build supports ({supported})")]
    TooNew { found: u32, supported: u32 },

    #[error("config is not a JSON object")]
    NotAnObject,

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("anonymization setup failed: {0}")]
    Anonymize(#[from] ferpa_anonymize::error::AnonymizeError),

    #[error("semantic analysis aborted: {0}")]
    Semantic(#[from] ferpa_semantic::error::SemanticError),
}
