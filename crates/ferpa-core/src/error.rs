use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),
}
