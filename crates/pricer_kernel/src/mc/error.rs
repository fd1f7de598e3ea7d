//! Error types for the Monte Carlo kernel.
//!
//! This module defines structured error types for configuration validation
//! and runtime failures during path simulation.

use pricer_core::types::DateError;
use pricer_models::models::ModelError;
use std::fmt;
use thiserror::Error;

/// Configuration error for path simulation.
///
/// These errors occur during construction when invalid parameters are provided.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Path count outside valid range [1, 10_000_000].
    InvalidPathCount(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPathCount(count) => {
                write!(
                    f,
                    "Invalid path count {}: must be in range [1, 10_000_000]",
                    count
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Runtime failure while generating or reducing paths.
///
/// Any of these aborts the whole generation: a partial path set is never
/// returned.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Invalid simulation configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The short-rate model could not be evaluated.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The random source returned NaN or infinity.
    #[error("Non-finite normal draw on path {path}, step {step}")]
    NonFiniteDraw {
        /// Path index
        path: usize,
        /// Step index (1-based grid point being generated)
        step: usize,
    },

    /// A simulated short rate is NaN or infinite.
    #[error("Non-finite short rate on path {path}, step {step}")]
    NonFiniteRate {
        /// Path index
        path: usize,
        /// Grid point index
        step: usize,
    },

    /// Path data does not match the declared shape.
    #[error("Path data has {got} values, expected {expected}")]
    ShapeMismatch {
        /// `n_paths × n_points`
        expected: usize,
        /// Values supplied
        got: usize,
    },

    /// Fixing date arithmetic failed.
    #[error(transparent)]
    Date(#[from] DateError),
}
