//! Evaluation error types.

use thermos_grid::GridError;

/// Errors that can occur during evaluation.
#[derive(Debug, thiserror::Error)]
pub enum EvaluateError {
    /// One or more validation checks failed.
    #[error("{count} validation error(s): {details}")]
    Validation { count: usize, details: String },

    /// Loading, alignment or metric failure from the comparator.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// JSON serialization failed.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl EvaluateError {
    /// Returns `true` if a batch should skip the model and continue.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Grid(e) => e.is_recoverable(),
            Self::Validation { .. } | Self::Serialization { .. } => false,
        }
    }
}
