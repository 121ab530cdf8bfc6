use thiserror::Error;

/// Top-level error type for the persona pipeline.
///
/// Each variant maps to one branch of the stage-failure taxonomy. Subsystem
/// crates define their own error types and implement `From<SubsystemError>
/// for PersonaError` so that the `?` operator works seamlessly across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersonaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Missing input artifact: {0}")]
    MissingInput(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Schema validation failed: {0}")]
    SchemaValidation(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for PersonaError {
    fn from(err: toml::de::Error) -> Self {
        PersonaError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for PersonaError {
    fn from(err: toml::ser::Error) -> Self {
        PersonaError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for PersonaError {
    fn from(err: serde_json::Error) -> Self {
        PersonaError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for persona operations.
pub type Result<T> = std::result::Result<T, PersonaError>;
