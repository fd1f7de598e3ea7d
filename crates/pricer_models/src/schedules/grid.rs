//! Simulation date/time grid.

use super::error::ScheduleError;
use super::schedule::{schedule_dates, DateGeneration};
use pricer_core::types::{Date, DayCountConvention, Tenor};

/// Deterministic date and time discretisation shared by every stage of an
/// exposure run.
///
/// Dates are an unadjusted forward schedule `d0 = start, d0 + tenor, ...,
/// end` (a short final stub is kept when the tenor does not divide the
/// horizon). Times are year fractions from `d0` under the grid day count,
/// so `t0 = 0` and dates and times are in strict 1:1 correspondence.
///
/// # Examples
///
/// ```
/// use pricer_models::schedules::SimulationGrid;
/// use pricer_core::types::Date;
///
/// let grid = SimulationGrid::new(
///     Date::from_ymd(2018, 12, 14).unwrap(),
///     Date::from_ymd(2019, 2, 22).unwrap(),
///     "1W".parse().unwrap(),
/// )
/// .unwrap();
///
/// assert_eq!(grid.size(), 11);
/// assert_eq!(grid.steps(), 10);
/// assert!((grid.dt() - 7.0 / 365.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationGrid {
    dates: Vec<Date>,
    times: Vec<f64>,
    tenor: Tenor,
    day_count: DayCountConvention,
}

impl SimulationGrid {
    /// Builds an ACT/365 grid from `start` to `end` at `tenor` steps.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` unless `end > start`.
    pub fn new(start: Date, end: Date, tenor: Tenor) -> Result<Self, ScheduleError> {
        Self::with_day_count(start, end, tenor, DayCountConvention::ActualActual365)
    }

    /// Builds a grid with an explicit time day count.
    pub fn with_day_count(
        start: Date,
        end: Date,
        tenor: Tenor,
        day_count: DayCountConvention,
    ) -> Result<Self, ScheduleError> {
        let dates = schedule_dates(start, end, tenor, DateGeneration::Forward)?;
        let times = dates
            .iter()
            .map(|&d| day_count.year_fraction(start, d))
            .collect();
        Ok(Self {
            dates,
            times,
            tenor,
            day_count,
        })
    }

    /// Grid dates `d0..=dn`.
    #[inline]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Grid times `t0..=tn`, with `t0 = 0`.
    #[inline]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Number of grid points (`n + 1`).
    #[inline]
    pub fn size(&self) -> usize {
        self.dates.len()
    }

    /// Number of steps (`n`).
    #[inline]
    pub fn steps(&self) -> usize {
        self.dates.len() - 1
    }

    /// Last grid time.
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Constant step size `maturity / n`.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.maturity() / self.steps() as f64
    }

    /// Step tenor.
    #[inline]
    pub fn tenor(&self) -> Tenor {
        self.tenor
    }

    /// Day count used for grid times.
    #[inline]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// First grid date.
    #[inline]
    pub fn start(&self) -> Date {
        self.dates[0]
    }

    /// Last grid date.
    #[inline]
    pub fn end(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }

    /// Per-step time increments `t[k+1] - t[k]`, `n` values.
    pub fn increments(&self) -> impl Iterator<Item = f64> + '_ {
        self.times.windows(2).map(|w| w[1] - w[0])
    }
}
