//! Instrument error types.
//!
//! This module provides structured error handling for swap construction
//! and valuation.

use pricer_core::market_data::MarketDataError;
use pricer_core::types::{Date, DateError};
use thiserror::Error;

use super::rates::FixingError;
use crate::schedules::ScheduleError;

/// Instrument-related errors.
///
/// # Variants
/// - `InvalidNotional`: Notional is zero, negative, or non-finite
/// - `InvalidParameter`: General parameter validation failure
/// - `ZeroAnnuity`: No live fixed cash flows remain to solve a par rate against
/// - `NonFinite`: Valuation produced NaN or infinity
/// - wrapped schedule, date, curve, and fixing failures
///
/// # Examples
/// ```
/// use pricer_models::instruments::InstrumentError;
///
/// let err = InstrumentError::InvalidNotional { notional: -1.0 };
/// assert!(format!("{}", err).contains("-1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// Invalid notional amount.
    #[error("Invalid notional: {notional}")]
    InvalidNotional {
        /// The invalid notional value
        notional: f64,
    },

    /// General parameter validation failure.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Annuity of the live fixed periods is zero.
    #[error("Zero annuity: no fixed cash flows after {valuation_date}")]
    ZeroAnnuity {
        /// Valuation date
        valuation_date: Date,
    },

    /// Valuation produced NaN or infinity.
    #[error("Non-finite {quantity}")]
    NonFinite {
        /// What was being computed
        quantity: &'static str,
    },

    /// Schedule generation failed.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// Date arithmetic failed.
    #[error(transparent)]
    Date(#[from] DateError),

    /// Curve query failed.
    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    /// Fixing lookup failed.
    #[error(transparent)]
    Fixing(#[from] FixingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixing_error_wraps_transparently() {
        let date = Date::from_ymd(2019, 3, 12).unwrap();
        let err: InstrumentError = FixingError::EmptyTable { date }.into();
        assert!(matches!(err, InstrumentError::Fixing(_)));
        assert_eq!(
            err.to_string(),
            FixingError::EmptyTable { date }.to_string()
        );
    }

    #[test]
    fn test_date_error_wraps_transparently() {
        let err: InstrumentError = DateError::InvalidTenor("0W".to_string()).into();
        assert_eq!(err.to_string(), "Invalid tenor: 0W");
    }
}
