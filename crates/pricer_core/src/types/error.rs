//! Errors from date construction, parsing, and tenor arithmetic.

use std::fmt;

/// Date-related errors.
///
/// # Variants
/// - `InvalidDate`: Invalid date components (e.g., February 30th)
/// - `ParseError`: Failed to parse date string
/// - `InvalidTenor`: Tenor string malformed or tenor length non-positive
/// - `OutOfRange`: Date arithmetic left the representable calendar
///
/// # Examples
/// ```
/// use pricer_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 2024-2-30");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components (e.g., February 30th).
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Failed to parse date string.
    ParseError(String),

    /// Tenor string malformed or non-positive.
    InvalidTenor(String),

    /// Date arithmetic overflowed the supported calendar.
    OutOfRange(String),
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateError::InvalidDate { year, month, day } => {
                write!(f, "Invalid date: {}-{}-{}", year, month, day)
            }
            DateError::ParseError(msg) => write!(f, "Date parse error: {}", msg),
            DateError::InvalidTenor(msg) => write!(f, "Invalid tenor: {}", msg),
            DateError::OutOfRange(msg) => write!(f, "Date out of range: {}", msg),
        }
    }
}

impl std::error::Error for DateError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_error_display() {
        let err = DateError::InvalidTenor("0W".to_string());
        assert_eq!(format!("{}", err), "Invalid tenor: 0W");

        let err = DateError::ParseError("bad".to_string());
        assert_eq!(format!("{}", err), "Date parse error: bad");
    }

    #[test]
    fn test_date_errors_compare_by_value() {
        let a = DateError::InvalidDate {
            year: 2023,
            month: 2,
            day: 29,
        };
        assert_eq!(a.clone(), a);
        assert_ne!(a, DateError::OutOfRange("2023-2-29".to_string()));
    }
}
