//! Interest rate stochastic models.
//!
//! ## Hull-White 1F
//!
//! The Hull-White model describes short rate dynamics with mean reversion:
//! ```text
//! dr(t) = [theta(t) - a * r(t)] * dt + sigma * dW(t)
//! ```

pub mod hull_white;

pub use hull_white::{HullWhiteModel, HullWhiteParams};
