use thiserror::Error;

use persona_core::error::PersonaError;

/// Errors raised by the insight pipeline.
///
/// Converts into [`PersonaError`] at the stage boundary so callers see one
/// error type across the whole pipeline.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("synthesis capability error: {0}")]
    Capability(String),

    #[error(transparent)]
    Core(#[from] PersonaError),
}

impl From<InsightError> for PersonaError {
    fn from(err: InsightError) -> Self {
        match err {
            InsightError::InsufficientData(msg) => PersonaError::InsufficientData(msg),
            InsightError::Capability(msg) => PersonaError::Synthesis(msg),
            InsightError::Core(e) => e,
        }
    }
}
