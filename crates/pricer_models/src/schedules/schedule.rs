//! Schedule and ScheduleBuilder implementation.

use super::error::ScheduleError;
use super::period::Period;
use pricer_core::types::{Date, DayCountConvention, Tenor};

/// Direction in which regular dates are rolled off an anchor.
///
/// Any stub lands at the opposite end from the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateGeneration {
    /// Anchor on the start date; stub (if any) at the end.
    #[default]
    Forward,
    /// Anchor on the end date; stub (if any) at the start.
    Backward,
}

/// Generates unadjusted schedule dates from `start` to `end` inclusive.
///
/// Regular dates are `anchor ± k·tenor`, always computed from the anchor.
/// No calendar or business-day roll is applied.
///
/// # Examples
///
/// ```
/// use pricer_models::schedules::{schedule_dates, DateGeneration};
/// use pricer_core::types::{Date, Tenor};
///
/// let start = Date::from_ymd(2018, 12, 14).unwrap();
/// let end = Date::from_ymd(2019, 1, 7).unwrap();
/// let weekly: Tenor = "1W".parse().unwrap();
///
/// let forward = schedule_dates(start, end, weekly, DateGeneration::Forward).unwrap();
/// assert_eq!(forward.len(), 5);
/// assert_eq!(forward[3], Date::from_ymd(2019, 1, 4).unwrap());
///
/// let backward = schedule_dates(start, end, weekly, DateGeneration::Backward).unwrap();
/// assert_eq!(backward[1], Date::from_ymd(2018, 12, 17).unwrap());
/// ```
pub fn schedule_dates(
    start: Date,
    end: Date,
    tenor: Tenor,
    rule: DateGeneration,
) -> Result<Vec<Date>, ScheduleError> {
    if start >= end {
        return Err(ScheduleError::InvalidDateRange { start, end });
    }

    let mut dates = Vec::new();
    match rule {
        DateGeneration::Forward => {
            let mut k = 0;
            loop {
                let date = tenor.advance(start, k)?;
                if date >= end {
                    break;
                }
                dates.push(date);
                k += 1;
            }
            dates.push(end);
        }
        DateGeneration::Backward => {
            let mut k = 0;
            loop {
                let date = tenor.advance(end, -k)?;
                if date <= start {
                    break;
                }
                dates.push(date);
                k += 1;
            }
            dates.push(start);
            dates.reverse();
        }
    }
    Ok(dates)
}

/// A collection of accrual periods for a scheduled cash flow leg.
///
/// # Examples
///
/// ```
/// use pricer_models::schedules::{ScheduleBuilder, DateGeneration};
/// use pricer_core::types::{Date, DayCountConvention};
///
/// let schedule = ScheduleBuilder::new()
///     .start(Date::from_ymd(2018, 12, 14).unwrap())
///     .end(Date::from_ymd(2023, 12, 14).unwrap())
///     .tenor("3M".parse().unwrap())
///     .generation(DateGeneration::Backward)
///     .day_count(DayCountConvention::ActualActual360)
///     .build()
///     .unwrap();
///
/// assert_eq!(schedule.len(), 20);
/// assert_eq!(schedule.end_date(), Date::from_ymd(2023, 12, 14).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    periods: Vec<Period>,
}

impl Schedule {
    /// Creates a schedule from a non-empty list of periods.
    pub fn new(periods: Vec<Period>) -> Result<Self, ScheduleError> {
        if periods.is_empty() {
            return Err(ScheduleError::MissingField { field: "periods" });
        }
        Ok(Self { periods })
    }

    /// Returns the periods in the schedule.
    #[inline]
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Returns the number of periods.
    #[inline]
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Always false: a schedule holds at least one period.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Accrual start of the first period.
    #[inline]
    pub fn start_date(&self) -> Date {
        self.periods[0].start()
    }

    /// Accrual end of the last period.
    #[inline]
    pub fn end_date(&self) -> Date {
        self.periods[self.periods.len() - 1].end()
    }

    /// Payment dates in schedule order.
    pub fn payment_dates(&self) -> Vec<Date> {
        self.periods.iter().map(|p| p.payment()).collect()
    }

    /// Returns an iterator over the periods.
    pub fn iter(&self) -> impl Iterator<Item = &Period> {
        self.periods.iter()
    }

    /// Sum of all accrual year fractions.
    pub fn total_year_fraction(&self) -> f64 {
        self.periods.iter().map(|p| p.year_fraction()).sum()
    }
}

/// Builder for accrual schedules.
#[derive(Debug, Clone)]
pub struct ScheduleBuilder {
    start_date: Option<Date>,
    end_date: Option<Date>,
    tenor: Option<Tenor>,
    generation: DateGeneration,
    day_count: DayCountConvention,
}

impl Default for ScheduleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleBuilder {
    /// Creates a new builder: forward generation, ACT/365.
    pub fn new() -> Self {
        Self {
            start_date: None,
            end_date: None,
            tenor: None,
            generation: DateGeneration::Forward,
            day_count: DayCountConvention::ActualActual365,
        }
    }

    /// Sets the start date of the schedule.
    pub fn start(mut self, date: Date) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Sets the end date of the schedule.
    pub fn end(mut self, date: Date) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Sets the accrual tenor.
    pub fn tenor(mut self, tenor: Tenor) -> Self {
        self.tenor = Some(tenor);
        self
    }

    /// Sets the date generation rule.
    pub fn generation(mut self, generation: DateGeneration) -> Self {
        self.generation = generation;
        self
    }

    /// Sets the day count convention.
    pub fn day_count(mut self, dc: DayCountConvention) -> Self {
        self.day_count = dc;
        self
    }

    /// Builds the schedule.
    ///
    /// # Errors
    ///
    /// - A required field (start, end, tenor) is missing
    /// - Start date is not before end date
    pub fn build(self) -> Result<Schedule, ScheduleError> {
        let start = self
            .start_date
            .ok_or(ScheduleError::MissingField { field: "start" })?;
        let end = self
            .end_date
            .ok_or(ScheduleError::MissingField { field: "end" })?;
        let tenor = self
            .tenor
            .ok_or(ScheduleError::MissingField { field: "tenor" })?;

        let dates = schedule_dates(start, end, tenor, self.generation)?;
        let periods = dates
            .windows(2)
            .map(|w| Period::with_payment_on_end(w[0], w[1], self.day_count))
            .collect();
        Schedule::new(periods)
    }
}
