//! Error types for the thermos-grid crate.

/// Error type for all fallible operations in the thermos-grid crate.
///
/// `NotFound`, `AlignmentFailure`, `NoCommonYears` and `InvalidSeries` are
/// recoverable: a batch caller skips the affected model and carries on.
/// `ContractViolation` means the caller handed in inputs that were never
/// aligned or normalised, which is a programming error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// None of the candidate variable names is present in the dataset.
    #[error("none of the variables {aliases:?} found in dataset")]
    NotFound {
        /// The aliases that were tried, in order.
        aliases: Vec<String>,
    },

    /// Spatial dimensionality or shape differs between target and reference.
    #[error("alignment failed: {reason}")]
    AlignmentFailure {
        /// What did not match.
        reason: String,
    },

    /// The compared series share no year.
    #[error("no common years between model, observation and filter series")]
    NoCommonYears,

    /// The raw variable cannot form a valid series.
    #[error("invalid series '{name}': {reason}")]
    InvalidSeries {
        /// Variable or series name.
        name: String,
        /// Which invariant was violated.
        reason: String,
    },

    /// A precondition of the metric engine was not met by the caller.
    #[error("contract violation: {reason}")]
    ContractViolation {
        /// The violated precondition.
        reason: String,
    },
}

impl GridError {
    /// Returns `true` for the failures a batch run should skip over.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ContractViolation { .. })
    }
}
