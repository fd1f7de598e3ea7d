//! # pricer_core: Dates, Tenors, and Curves for Exposure Simulation
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core serves as the bottom layer of the 4-layer architecture, providing:
//! - Time types: `Date`, `DayCountConvention`, `Tenor` (`types::time`)
//! - Error types: `DateError` (`types::error`), `MarketDataError` (`market_data`)
//! - Curve abstractions: `YieldCurve`, `FlatCurve`, `DiscountCurve` (`market_data`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - chrono: Date arithmetic
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::market_data::curves::{DiscountCurve, YieldCurve};
//! use pricer_core::types::{Date, DayCountConvention, Tenor};
//!
//! let start = Date::from_ymd(2018, 12, 14).unwrap();
//! let yearly: Tenor = "1Y".parse().unwrap();
//!
//! let pillars: Vec<(Date, f64)> = (1..=5)
//!     .map(|k| (yearly.advance(start, k).unwrap(), (-0.03 * k as f64).exp()))
//!     .collect();
//! let curve = DiscountCurve::from_dates(start, &pillars, DayCountConvention::ActualActual365)
//!     .unwrap();
//!
//! assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for Date, Tenor, DayCountConvention

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod types;
