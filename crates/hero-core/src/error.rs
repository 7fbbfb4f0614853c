use thiserror::Error;

/// Errors surfaced by the hero scene core.
///
/// Construction of the scene itself has no recoverable failures beyond an
/// invalid configuration; the remaining variants belong to the page-level
/// collaborators. A missing mount element is not an error: mounting resolves
/// to nothing.
#[derive(Debug, Error)]
pub enum HeroError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("{0}")]
    Validation(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("{0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, HeroError>;
