use thiserror::Error;

/// Errors returned by clustering operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KFuzzyError {
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl KFuzzyError {
    /// Returns true for errors caused by the supplied vectors or counts,
    /// as opposed to the clustering options.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            KFuzzyError::DimensionMismatch { .. } | KFuzzyError::InvalidInput(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, KFuzzyError>;
