use pricer_core::market_data::MarketDataError;
use pricer_core::types::DateError;
use pricer_models::schedules::ScheduleError;
use thiserror::Error;

/// Malformed or unreadable input data.
#[derive(Debug, Error)]
pub enum DataError {
    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV framing failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Work unit payload could not be (de)serialised.
    #[error("Payload error: {0}")]
    Json(#[from] serde_json::Error),

    /// A field could not be parsed.
    #[error("Line {line}: {message}")]
    Parse {
        /// 1-based line number, header included
        line: usize,
        /// What went wrong
        message: String,
    },

    /// The curve table does not form a valid curve.
    #[error("Invalid curve: {0}")]
    Curve(#[from] MarketDataError),

    /// Grid or schedule specification is invalid.
    #[error("Invalid schedule: {0}")]
    Schedule(#[from] ScheduleError),

    /// Bad date arithmetic.
    #[error(transparent)]
    Date(#[from] DateError),

    /// Structurally valid data with inconsistent content.
    #[error("Invalid input: {0}")]
    Invalid(String),
}
