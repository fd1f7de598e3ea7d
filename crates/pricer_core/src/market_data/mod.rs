//! Market data structures for curve-based pricing.
//!
//! # Architecture
//!
//! All curves are generic over `T: Float`. Every curve in a simulation run
//! (the t=0 market curve and each per-path snapshot) is a
//! [`curves::DiscountCurve`] sharing the [`curves::YieldCurve`] query API.
//!
//! # Components
//!
//! - [`curves`]: Yield curve trait and implementations (FlatCurve, DiscountCurve)
//! - [`error`]: Market data error types (MarketDataError)
//!
//! # Example
//!
//! ```
//! use pricer_core::market_data::curves::{YieldCurve, FlatCurve};
//!
//! let curve = FlatCurve::new(0.05_f64);
//! let df = curve.discount_factor(1.0).unwrap();
//! assert!((df - 0.951229).abs() < 1e-5);
//! ```

pub mod curves;
pub mod error;

pub use curves::{DiscountCurve, FlatCurve, YieldCurve};
pub use error::MarketDataError;
