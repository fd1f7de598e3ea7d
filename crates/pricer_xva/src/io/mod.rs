//! CSV input and output.
//!
//! - Market curve: `date,discount_factor`
//! - Simulated fixings: `date,fixing`
//! - Per-path exposures: a single comma-separated row, no header
//! - Exposure report: `date,epe,ene`
//!
//! Dates are read as `MM/DD/YYYY` or ISO `YYYY-MM-DD` and written as
//! `MM/DD/YYYY`.

mod curve;
mod error;
mod fixings;
mod report;

pub use curve::{load_discount_curve, read_discount_curve};
pub use error::DataError;
pub use fixings::{read_fixings, write_fixings};
pub use report::{read_exposure_row, write_exposure_report, write_exposure_row};

use pricer_core::types::{Date, DateError};

/// Date format used in every file this crate writes.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Parses `MM/DD/YYYY`, falling back to ISO `YYYY-MM-DD`.
///
/// # Examples
///
/// ```
/// use pricer_xva::io::parse_date;
/// use pricer_core::types::Date;
///
/// let expected = Date::from_ymd(2018, 12, 14).unwrap();
/// assert_eq!(parse_date("12/14/2018").unwrap(), expected);
/// assert_eq!(parse_date("2018-12-14").unwrap(), expected);
/// assert!(parse_date("14.12.2018").is_err());
/// ```
pub fn parse_date(s: &str) -> Result<Date, DateError> {
    let trimmed = s.trim();
    Date::parse_with_format(trimmed, DATE_FORMAT).or_else(|_| Date::parse(trimmed))
}

/// Formats a date as `MM/DD/YYYY`.
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
}
