//! Core time and error types.
//!
//! This module provides:
//! - `time`: Time types (Date, DayCountConvention, Tenor) for schedule and grid generation
//! - `error`: Date construction and tenor arithmetic errors
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`Date`], [`DayCountConvention`], [`Tenor`], [`TenorUnit`] from `time`
//! - [`DateError`] from `error`

pub mod error;
pub mod time;

pub use error::DateError;
pub use time::{Date, DayCountConvention, Tenor, TenorUnit};
