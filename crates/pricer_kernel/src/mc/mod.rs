//! Monte Carlo short-rate simulation.
//!
//! # Architecture
//!
//! ```text
//! ShortRatePathGenerator
//! ├── HullWhiteModel    (curve-fitted shift and exact OU transition)
//! ├── SimulationGrid    (dates and year fractions)
//! ├── SimulationConfig  (path count, seed)
//! └── PricerRng         (single seeded stream)
//!         │
//!         ▼
//!   ShortRatePaths ──► simulate_fixings() ──► FixingTable
//! ```

mod config;
mod error;
mod fixings;
mod paths;

pub use config::{SimulationConfig, SimulationConfigBuilder, MAX_PATHS};
pub use error::{ConfigError, SimulationError};
pub use fixings::simulate_fixings;
pub use paths::{ShortRatePathGenerator, ShortRatePaths};
