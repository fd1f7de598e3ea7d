//! Instrument definitions.
//!
//! - [`rates`]: Vanilla fixed/float interest rate swap, IBOR index, and
//!   fixing table with leg pricing
//! - [`InstrumentError`]: Construction and valuation errors

mod error;
pub mod rates;

pub use error::InstrumentError;
