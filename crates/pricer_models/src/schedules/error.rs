//! Schedule generation error types.

use pricer_core::types::{Date, DateError};
use thiserror::Error;

/// Errors that can occur during schedule and grid generation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Start date must be before end date.
    #[error("Start date {start} must be before end date {end}")]
    InvalidDateRange {
        /// The start date.
        start: Date,
        /// The end date.
        end: Date,
    },

    /// Missing required field in builder.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Date arithmetic failure.
    #[error(transparent)]
    Date(#[from] DateError),
}
