use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Query is empty")]
    EmptyQuery,

    #[error("Cannot normalize confidence over zero document groups")]
    EmptyGroups,

    #[error("Vector search failed: {0}")]
    Search(String),

    #[error("Answer synthesis failed: {0}")]
    Synthesis(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for failures raised by an external collaborator rather than by
    /// the caller's input.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, Error::Search(_) | Error::Synthesis(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
