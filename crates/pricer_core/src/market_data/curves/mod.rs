//! Curve abstractions for discounting and forecasting.
//!
//! This module provides:
//! - [`YieldCurve`]: Generic trait for discount factor and rate calculations
//! - [`FlatCurve`]: Constant rate yield curve implementation
//! - [`DiscountCurve`]: Dated, log-linear discount curve with flat-forward extrapolation

mod discount;
mod flat;
mod traits;

pub use discount::DiscountCurve;
pub use flat::FlatCurve;
pub use traits::YieldCurve;
