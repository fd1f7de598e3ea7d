//! Schedule and grid generation.
//!
//! This module provides:
//! - [`SimulationGrid`]: Unadjusted date/time grid driving path simulation and revaluation
//! - [`Schedule`]: A collection of accrual periods for a swap leg
//! - [`Period`]: A single accrual period with start, end, and payment dates
//! - [`ScheduleBuilder`]: Builder pattern for constructing schedules
//! - [`DateGeneration`]: Forward or backward date rolling
//!
//! # Examples
//!
//! ```
//! use pricer_models::schedules::{ScheduleBuilder, DateGeneration};
//! use pricer_core::types::{Date, DayCountConvention};
//!
//! let schedule = ScheduleBuilder::new()
//!     .start(Date::from_ymd(2024, 1, 15).unwrap())
//!     .end(Date::from_ymd(2026, 1, 15).unwrap())
//!     .tenor("6M".parse().unwrap())
//!     .generation(DateGeneration::Backward)
//!     .day_count(DayCountConvention::ActualActual360)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schedule.periods().len(), 4);
//! ```

mod error;
mod grid;
mod period;
mod schedule;

pub use error::ScheduleError;
pub use grid::SimulationGrid;
pub use period::Period;
pub use schedule::{schedule_dates, DateGeneration, Schedule, ScheduleBuilder};
