//! Period definition for scheduled instruments.

use pricer_core::types::{Date, DayCountConvention};
use std::fmt;

/// A single accrual period in a schedule.
///
/// # Examples
///
/// ```
/// use pricer_models::schedules::Period;
/// use pricer_core::types::{Date, DayCountConvention};
///
/// let period = Period::new(
///     Date::from_ymd(2019, 3, 14).unwrap(),
///     Date::from_ymd(2019, 6, 14).unwrap(),
///     Date::from_ymd(2019, 6, 14).unwrap(),
///     DayCountConvention::ActualActual360,
/// );
///
/// assert!((period.year_fraction() - 92.0 / 360.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Period {
    start: Date,
    end: Date,
    payment: Date,
    day_count: DayCountConvention,
}

impl Period {
    /// Creates a new period with the specified dates and day count convention.
    pub fn new(start: Date, end: Date, payment: Date, day_count: DayCountConvention) -> Self {
        Self {
            start,
            end,
            payment,
            day_count,
        }
    }

    /// Creates a period paying on its accrual end date.
    pub fn with_payment_on_end(start: Date, end: Date, day_count: DayCountConvention) -> Self {
        Self::new(start, end, end, day_count)
    }

    /// Accrual start date.
    #[inline]
    pub fn start(&self) -> Date {
        self.start
    }

    /// Accrual end date.
    #[inline]
    pub fn end(&self) -> Date {
        self.end
    }

    /// Payment date.
    #[inline]
    pub fn payment(&self) -> Date {
        self.payment
    }

    /// Day count convention used for accrual.
    #[inline]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Accrual year fraction under the period's day count.
    pub fn year_fraction(&self) -> f64 {
        self.day_count.year_fraction(self.start, self.end)
    }

    /// Accrual length in calendar days.
    pub fn days(&self) -> i64 {
        self.end - self.start
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} -> {}] pay {} ({})",
            self.start, self.end, self.payment, self.day_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_on_accrual_end() {
        let start = Date::from_ymd(2019, 3, 14).unwrap();
        let end = Date::from_ymd(2019, 6, 14).unwrap();
        let period = Period::with_payment_on_end(start, end, DayCountConvention::ActualActual360);

        assert_eq!(period.days(), 92);
        assert_eq!(period.payment(), end);
    }

    #[test]
    fn test_display() {
        let period = Period::with_payment_on_end(
            Date::from_ymd(2019, 3, 14).unwrap(),
            Date::from_ymd(2019, 6, 14).unwrap(),
            DayCountConvention::ActualActual360,
        );
        assert_eq!(
            period.to_string(),
            "[2019-03-14 -> 2019-06-14] pay 2019-06-14 (ACT/360)"
        );
    }
}
