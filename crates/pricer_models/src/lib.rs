//! # Pricer Models (L2: Business Logic)
//!
//! Schedules, the Hull-White one-factor short-rate model and the vanilla
//! interest rate swap it is used to value.
//!
//! This crate provides:
//! - Unadjusted accrual schedules and the simulation date/time grid
//! - Closed-form Hull-White zero-coupon bond prices
//! - Interest rate swap definitions, fixing tables and leg pricing
//!
//! ## Design Principles
//!
//! - **Borrowed market data**: models hold a reference to the initial curve
//!   rather than owning a copy
//! - **Fallible construction**: every parameter check happens once, in `new`
//! - **Builder pattern** for ergonomic schedule construction
//!
//! ## Example
//!
//! ```
//! use pricer_core::market_data::curves::FlatCurve;
//! use pricer_models::models::rates::{HullWhiteModel, HullWhiteParams};
//!
//! let curve = FlatCurve::new(0.03);
//! let params = HullWhiteParams::new(0.1421842834, 0.0081355969).unwrap();
//! let model = HullWhiteModel::new(params, &curve);
//!
//! let p = model.zero_bond(1.0, 3.0, 0.03).unwrap();
//! assert!(p > 0.0 && p < 1.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod instruments;
pub mod models;
pub mod schedules;
