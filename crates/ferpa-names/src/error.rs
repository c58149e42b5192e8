use thiserror::Error;

#[derive(Debug, Error)]
pub enum NameError {
    #[error("failed to compile name pattern for '{canonical}': {source}")]
    Pattern {
        canonical: String,
        #[source]
        source: regex::Error,
    },
}
