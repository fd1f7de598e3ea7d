//! CLI error types

use pricer_kernel::mc::SimulationError;
use pricer_models::instruments::InstrumentError;
use pricer_xva::io::DataError;
use pricer_xva::{DispatchError, ExposureError, StoreError};
use thiserror::Error;

use crate::config::ConfigError;

/// CLI result alias
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Path simulation failed: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Swap setup failed: {0}")]
    Instrument(#[from] InstrumentError),

    #[error("Exposure run failed: {0}")]
    Exposure(#[from] ExposureError),

    #[error("Result store error: {0}")]
    Store(#[from] StoreError),

    #[error("Worker pool error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
