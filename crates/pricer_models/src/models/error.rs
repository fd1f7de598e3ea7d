//! Model error types.

use pricer_core::market_data::MarketDataError;
use thiserror::Error;

/// Errors raised by short-rate model construction and evaluation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// Parameter outside its valid domain.
    #[error("Invalid model parameter {name} = {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// Bond maturity earlier than the observation time.
    #[error("Invalid bond interval: t = {t}, T = {maturity}")]
    InvalidInterval {
        /// Observation time
        t: f64,
        /// Bond maturity
        maturity: f64,
    },

    /// Evaluation produced NaN or infinity.
    #[error("Non-finite {quantity} at t = {t}")]
    NonFinite {
        /// What was being computed
        quantity: &'static str,
        /// Time of evaluation
        t: f64,
    },

    /// Failure reading the initial curve.
    #[error(transparent)]
    MarketData(#[from] MarketDataError),
}
