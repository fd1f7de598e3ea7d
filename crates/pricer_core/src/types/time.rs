//! Time types, tenors, and day count conventions for financial calculations.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate
//! - `DayCountConvention`: Industry-standard day count conventions
//! - `Tenor`: Calendar period such as `1W` or `3M` with unadjusted date arithmetic
//!
//! # Examples
//!
//! ```
//! use pricer_core::types::time::{Date, DayCountConvention, Tenor};
//!
//! let start = Date::from_ymd(2018, 12, 14).unwrap();
//! let weekly: Tenor = "1W".parse().unwrap();
//! let next = weekly.advance(start, 1).unwrap();
//! assert_eq!(next, Date::from_ymd(2018, 12, 21).unwrap());
//!
//! let yf = DayCountConvention::ActualActual365.year_fraction(start, next);
//! assert!((yf - 7.0 / 365.0).abs() < 1e-12);
//! ```

use chrono::{Datelike, Days, Months, NaiveDate};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// Provides ISO 8601 serialisation and unadjusted date arithmetic.
/// No holiday calendar is applied anywhere in the workspace: every
/// schedule is generated on raw calendar dates.
///
/// # Examples
///
/// ```
/// use pricer_core::types::time::Date;
///
/// let date = Date::from_ymd(2024, 6, 15).unwrap();
/// assert_eq!(date.year(), 2024);
///
/// let parsed: Date = "2024-06-15".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2024, 1, 11).unwrap();
/// assert_eq!(end - start, 10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// # Returns
    /// `Ok(Date)` if the date is valid, `Err(DateError::InvalidDate)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::Date;
    ///
    /// assert!(Date::from_ymd(2024, 2, 29).is_ok());
    /// assert!(Date::from_ymd(2023, 2, 29).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parses a date from ISO 8601 format string (YYYY-MM-DD).
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::Date;
    ///
    /// let date = Date::parse("2018-12-14").unwrap();
    /// assert_eq!(date.day(), 14);
    /// assert!(Date::parse("12/14/2018").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, DateError> {
        Self::parse_with_format(s, "%Y-%m-%d")
    }

    /// Parses a date using an explicit chrono format string.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::Date;
    ///
    /// let date = Date::parse_with_format("12/14/2018", "%m/%d/%Y").unwrap();
    /// assert_eq!(date, Date::from_ymd(2018, 12, 14).unwrap());
    /// ```
    pub fn parse_with_format(s: &str, format: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s.trim(), format)
            .map(Date)
            .map_err(|e| DateError::ParseError(format!("'{}': {}", s, e)))
    }

    /// Formats the date with an explicit chrono format string.
    pub fn format(&self, format: &str) -> String {
        self.0.format(format).to_string()
    }

    /// Returns the underlying NaiveDate.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Shifts the date by a signed number of calendar days.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::Date;
    ///
    /// let date = Date::from_ymd(2018, 12, 14).unwrap();
    /// assert_eq!(date.add_days(-2).unwrap(), Date::from_ymd(2018, 12, 12).unwrap());
    /// ```
    pub fn add_days(self, days: i64) -> Result<Self, DateError> {
        let shifted = if days >= 0 {
            self.0.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        shifted
            .map(Date)
            .ok_or_else(|| DateError::OutOfRange(format!("{} {:+} days", self, days)))
    }

    /// Shifts the date by a signed number of calendar months.
    ///
    /// Day-of-month is clamped to the last day of the target month
    /// (31 January + 1M = 28/29 February).
    pub fn add_months(self, months: i64) -> Result<Self, DateError> {
        let out_of_range = || DateError::OutOfRange(format!("{} {:+} months", self, months));
        let count = u32::try_from(months.unsigned_abs()).map_err(|_| out_of_range())?;
        let shifted = if months >= 0 {
            self.0.checked_add_months(Months::new(count))
        } else {
            self.0.checked_sub_months(Months::new(count))
        };
        shifted.map(Date).ok_or_else(out_of_range)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl Sub for Date {
    type Output = i64;

    /// Returns the signed number of days between two dates.
    fn sub(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, DateError> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    /// Formats the date as ISO 8601 (YYYY-MM-DD).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Day Count Convention (year fraction convention).
///
/// # Variants
/// - `ActualActual365`: Actual days / 365 (simulation grid and fixed legs)
/// - `ActualActual360`: Actual days / 360 (money market indices and curves)
/// - `Thirty360`: Each month treated as 30 days, year as 360 days
///
/// # Usage
///
/// ```
/// use pricer_core::types::time::{Date, DayCountConvention};
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2024, 7, 1).unwrap();
///
/// let yf = DayCountConvention::ActualActual360.year_fraction(start, end);
/// assert!((yf - 182.0 / 360.0).abs() < 1e-12);
///
/// // Reversed dates return a negative value
/// let yf_neg = DayCountConvention::ActualActual360.year_fraction(end, start);
/// assert!((yf + yf_neg).abs() < 1e-12);
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayCountConvention {
    /// Actual/365 Fixed: actual_days / 365.0
    ActualActual365,

    /// Actual/360: actual_days / 360.0
    ActualActual360,

    /// 30/360 US Bond Basis
    Thirty360,
}

impl DayCountConvention {
    /// Returns the standard convention name.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::DayCountConvention;
    ///
    /// assert_eq!(DayCountConvention::ActualActual365.name(), "ACT/365");
    /// assert_eq!(DayCountConvention::Thirty360.name(), "30/360");
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::ActualActual365 => "ACT/365",
            DayCountConvention::ActualActual360 => "ACT/360",
            DayCountConvention::Thirty360 => "30/360",
        }
    }

    /// Calculates the signed year fraction between two dates.
    ///
    /// Returns a negative value when `start > end`.
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        let days = end - start;

        match self {
            DayCountConvention::ActualActual365 => days as f64 / 365.0,
            DayCountConvention::ActualActual360 => days as f64 / 360.0,
            DayCountConvention::Thirty360 => {
                let (first, second, sign) = if start <= end {
                    (start, end, 1.0)
                } else {
                    (end, start, -1.0)
                };

                let d1 = if first.day() == 31 { 30 } else { first.day() };
                let d2 = if second.day() == 31 && d1 == 30 {
                    30
                } else {
                    second.day()
                };

                let days_30_360 = 360 * (second.year() - first.year())
                    + 30 * (second.month() as i32 - first.month() as i32)
                    + (d2 as i32 - d1 as i32);
                sign * days_30_360 as f64 / 360.0
            }
        }
    }
}

impl FromStr for DayCountConvention {
    type Err = String;

    /// Parses day count convention from string (case-insensitive).
    ///
    /// Supports multiple aliases for each convention:
    /// - ACT/365: "ACT/365", "Actual/365", "Act365", "A365", "ACT/365F"
    /// - ACT/360: "ACT/360", "Actual/360", "Act360", "A360"
    /// - 30/360: "30/360", "Thirty360", "30360"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(['/', ' '], "").as_str() {
            "ACT365" | "ACTUAL365" | "A365" | "ACT365F" | "ACTUAL365FIXED" => {
                Ok(DayCountConvention::ActualActual365)
            }
            "ACT360" | "ACTUAL360" | "A360" => Ok(DayCountConvention::ActualActual360),
            "30360" | "THIRTY360" => Ok(DayCountConvention::Thirty360),
            _ => Err(format!("Unknown day count convention: {}", s)),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Unit of a [`Tenor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TenorUnit {
    /// Calendar days
    Days,
    /// Calendar weeks (7 days)
    Weeks,
    /// Calendar months, end-of-month clamped
    Months,
    /// Calendar years (12 months)
    Years,
}

impl TenorUnit {
    fn suffix(&self) -> char {
        match self {
            TenorUnit::Days => 'D',
            TenorUnit::Weeks => 'W',
            TenorUnit::Months => 'M',
            TenorUnit::Years => 'Y',
        }
    }
}

/// Strictly positive calendar period, e.g. `1W` or `3M`.
///
/// Multiples are always taken from the anchor date
/// (`advance(d, k) = d + k·tenor`) rather than by repeated stepping, so
/// month-end clamping never drifts along a schedule.
///
/// # Examples
///
/// ```
/// use pricer_core::types::time::{Date, Tenor, TenorUnit};
///
/// let quarterly = Tenor::new(3, TenorUnit::Months).unwrap();
/// assert_eq!(quarterly.to_string(), "3M");
///
/// let start = Date::from_ymd(2019, 1, 31).unwrap();
/// assert_eq!(quarterly.advance(start, 1).unwrap(), Date::from_ymd(2019, 4, 30).unwrap());
/// assert_eq!(quarterly.advance(start, 2).unwrap(), Date::from_ymd(2019, 7, 31).unwrap());
///
/// assert!(Tenor::new(0, TenorUnit::Weeks).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tenor {
    length: u32,
    unit: TenorUnit,
}

impl Tenor {
    /// Creates a tenor; fails if `length` is zero.
    pub fn new(length: u32, unit: TenorUnit) -> Result<Self, DateError> {
        if length == 0 {
            return Err(DateError::InvalidTenor(format!("0{}", unit.suffix())));
        }
        Ok(Self { length, unit })
    }

    /// Number of units.
    #[inline]
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Tenor unit.
    #[inline]
    pub fn unit(&self) -> TenorUnit {
        self.unit
    }

    /// Returns `anchor + multiple·tenor` (negative multiples step backwards).
    pub fn advance(&self, anchor: Date, multiple: i64) -> Result<Date, DateError> {
        let n = multiple
            .checked_mul(i64::from(self.length))
            .ok_or_else(|| DateError::OutOfRange(format!("{} x {}", multiple, self)))?;
        match self.unit {
            TenorUnit::Days => anchor.add_days(n),
            TenorUnit::Weeks => anchor.add_days(n.saturating_mul(7)),
            TenorUnit::Months => anchor.add_months(n),
            TenorUnit::Years => anchor.add_months(n.saturating_mul(12)),
        }
    }
}

impl FromStr for Tenor {
    type Err = DateError;

    /// Parses `"<n><unit>"` with unit one of `D`, `W`, `M`, `Y` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, DateError> {
        let trimmed = s.trim();
        let invalid = || DateError::InvalidTenor(s.to_string());

        let split = trimmed
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .ok_or_else(invalid)?;
        let (digits, unit) = trimmed.split_at(split);
        let length: u32 = digits.parse().map_err(|_| invalid())?;
        let unit = match unit.to_ascii_uppercase().as_str() {
            "D" => TenorUnit::Days,
            "W" => TenorUnit::Weeks,
            "M" => TenorUnit::Months,
            "Y" => TenorUnit::Years,
            _ => return Err(invalid()),
        };
        Tenor::new(length, unit)
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.length, self.unit.suffix())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{DayCountConvention, Tenor};
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    impl Serialize for DayCountConvention {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> Deserialize<'de> for DayCountConvention {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            DayCountConvention::from_str(&s).map_err(de::Error::custom)
        }
    }

    impl Serialize for Tenor {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Tenor {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            Tenor::from_str(&s).map_err(de::Error::custom)
        }
    }
}
