use thiserror::Error;

/// Failures that can cross a patente component boundary.
///
/// "No plate found" and "record not found" are not errors; they surface as
/// `None` from the extractor and the store respectively.
#[derive(Debug, Error)]
pub enum PlateError {
    #[error("text recognition failed: {0}")]
    Recognition(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlateError {
    pub fn recognition(err: impl std::fmt::Display) -> Self {
        Self::Recognition(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlateError>;
