//! # Pricer Kernel (L3: Simulation Engine)
//!
//! Seeded Monte Carlo engine for Hull-White short-rate paths.
//!
//! This crate provides:
//! - A reproducible random number generator ([`rng::PricerRng`])
//! - Exact-transition short-rate path generation ([`mc::ShortRatePathGenerator`])
//! - Simulated index fixings derived from the path set ([`mc::simulate_fixings`])
//!
//! ## Example
//!
//! ```rust
//! use pricer_core::market_data::curves::FlatCurve;
//! use pricer_core::types::Date;
//! use pricer_kernel::mc::{ShortRatePathGenerator, SimulationConfig};
//! use pricer_models::models::rates::{HullWhiteModel, HullWhiteParams};
//! use pricer_models::schedules::SimulationGrid;
//!
//! let curve = FlatCurve::new(0.03);
//! let model = HullWhiteModel::new(HullWhiteParams::new(0.14, 0.008).unwrap(), &curve);
//! let grid = SimulationGrid::new(
//!     Date::from_ymd(2018, 12, 14).unwrap(),
//!     Date::from_ymd(2019, 12, 14).unwrap(),
//!     "1W".parse().unwrap(),
//! )
//! .unwrap();
//! let config = SimulationConfig::builder().n_paths(100).seed(42).build().unwrap();
//!
//! let (paths, seed) = ShortRatePathGenerator::new(model, &grid, config).generate().unwrap();
//! assert_eq!(seed, 42);
//! assert_eq!(paths.n_points(), grid.size());
//! ```

#![warn(missing_docs)]

pub mod mc;
pub mod rng;
