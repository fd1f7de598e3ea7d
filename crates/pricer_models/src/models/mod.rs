//! Short-rate models.
//!
//! - [`rates::HullWhiteModel`]: Hull-White one-factor model with analytic
//!   zero-coupon bond repricing and exact Gaussian transitions
//! - [`ModelError`]: Model construction and evaluation errors

mod error;
pub mod rates;

pub use error::ModelError;
