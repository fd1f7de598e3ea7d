//! Market data error types.
//!
//! This module provides structured error handling for discount curve
//! construction and lookups.

use crate::types::{Date, DateError};
use thiserror::Error;

/// Market data operation errors.
///
/// # Variants
///
/// - `InvalidMaturity`: Negative time to maturity or degenerate interval
/// - `InsufficientData`: Not enough pillars for construction
/// - `NonPositiveDiscountFactor`: A pillar or query produced `D(t) <= 0`
/// - `NonFinite`: A pillar or query produced NaN or infinity
/// - `DuplicatePillar`: Two pillars share the same date
/// - `PillarBeforeReference`: A pillar lies before the curve reference date
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::MarketDataError;
///
/// let err = MarketDataError::InvalidMaturity { t: -1.0 };
/// assert!(format!("{}", err).contains("-1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Invalid maturity (negative time).
    #[error("Invalid maturity: t = {t}")]
    InvalidMaturity {
        /// The invalid maturity value
        t: f64,
    },

    /// Insufficient data for construction.
    #[error("Insufficient data: got {got}, need {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },

    /// Discount factor at or below zero.
    #[error("Non-positive discount factor {df} at t = {t}")]
    NonPositiveDiscountFactor {
        /// Time of the offending discount factor
        t: f64,
        /// The offending discount factor
        df: f64,
    },

    /// NaN or infinite value encountered.
    #[error("Non-finite value {value} at t = {t}")]
    NonFinite {
        /// Time of the offending value
        t: f64,
        /// The offending value
        value: f64,
    },

    /// Two pillars with the same date.
    #[error("Duplicate pillar date {date}")]
    DuplicatePillar {
        /// The repeated date
        date: Date,
    },

    /// Pillar earlier than the curve reference date.
    #[error("Pillar {date} precedes reference date {reference}")]
    PillarBeforeReference {
        /// The pillar date
        date: Date,
        /// The curve reference date
        reference: Date,
    },

    /// Date arithmetic failure while building pillars.
    #[error("Date error: {0}")]
    Date(#[from] DateError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_maturity_display() {
        let err = MarketDataError::InvalidMaturity { t: -1.5 };
        assert_eq!(format!("{}", err), "Invalid maturity: t = -1.5");
    }

    #[test]
    fn test_non_positive_df_display() {
        let err = MarketDataError::NonPositiveDiscountFactor { t: 2.0, df: -0.1 };
        assert_eq!(
            format!("{}", err),
            "Non-positive discount factor -0.1 at t = 2"
        );
    }

    #[test]
    fn test_pillar_before_reference_display() {
        let err = MarketDataError::PillarBeforeReference {
            date: Date::from_ymd(2018, 12, 10).unwrap(),
            reference: Date::from_ymd(2018, 12, 14).unwrap(),
        };
        assert_eq!(
            format!("{}", err),
            "Pillar 2018-12-10 precedes reference date 2018-12-14"
        );
    }
}
