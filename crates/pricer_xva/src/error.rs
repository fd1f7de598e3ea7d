//! Exposure run errors.
//!
//! [`ExposureError`] follows the failure classes of a run: bad input is
//! fatal before simulation, model and fixing failures are scoped to one
//! path, and an incomplete gather is surfaced with the exact indices that
//! are missing or failed.

use pricer_models::instruments::rates::FixingError;
use thiserror::Error;

use crate::io::DataError;

/// Shared result store failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing an entry failed.
    #[error("Store data error for '{key}': {source}")]
    Data {
        /// Entry key
        key: String,
        /// Underlying failure
        #[source]
        source: DataError,
    },

    /// A required entry has not been written.
    #[error("Store entry '{key}' not found")]
    NotFound {
        /// Entry key
        key: String,
    },

    /// A writer panicked while holding the store lock.
    #[error("Store lock poisoned")]
    Poisoned,
}

/// Exposure simulation error.
#[derive(Debug, Error)]
pub enum ExposureError {
    /// Malformed or missing market, fixing or payload data.
    #[error("Input error: {0}")]
    Input(#[from] DataError),

    /// A path produced a non-finite value or a non-positive discount factor.
    #[error("Model error on path {path}: {reason}")]
    Model {
        /// Path index
        path: usize,
        /// Failure description
        reason: String,
    },

    /// A floating reset could not be resolved from the fixing table.
    #[error("Fixing resolution failed on path {path}: {source}")]
    FixingResolution {
        /// Path index
        path: usize,
        /// Underlying lookup failure
        #[source]
        source: FixingError,
    },

    /// A unit of work could not be submitted.
    #[error("Dispatch of path {path} failed after {attempts} attempt(s)")]
    Dispatch {
        /// Path index
        path: usize,
        /// Submissions tried
        attempts: u32,
    },

    /// Fewer results than expected were observed before the gather timeout.
    #[error(
        "Incomplete aggregation: {} of {expected} paths missing, {} failed",
        .missing.len(),
        .failed.len()
    )]
    IncompleteAggregation {
        /// Paths dispatched
        expected: usize,
        /// Indices with no result at timeout
        missing: Vec<usize>,
        /// Indices whose worker reported a failure
        failed: Vec<usize>,
    },

    /// Shared store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ExposureError {
    /// Path index the error is scoped to, if any.
    pub fn path(&self) -> Option<usize> {
        match self {
            Self::Model { path, .. }
            | Self::FixingResolution { path, .. }
            | Self::Dispatch { path, .. } => Some(*path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_message_counts() {
        let err = ExposureError::IncompleteAggregation {
            expected: 10,
            missing: vec![7, 8, 9],
            failed: vec![],
        };
        assert_eq!(
            err.to_string(),
            "Incomplete aggregation: 3 of 10 paths missing, 0 failed"
        );
        assert_eq!(err.path(), None);
    }

    #[test]
    fn test_path_scoped_errors() {
        let err = ExposureError::Model {
            path: 4,
            reason: "non-positive discount factor".to_string(),
        };
        assert_eq!(err.path(), Some(4));
        assert!(err.to_string().contains("path 4"));
    }
}
