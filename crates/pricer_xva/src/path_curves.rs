//! Per-path discount curve snapshots.

use pricer_core::market_data::curves::DiscountCurve;
use pricer_core::market_data::MarketDataError;
use pricer_core::types::Date;
use pricer_models::models::rates::{HullWhiteModel, HullWhiteParams};
use pricer_models::models::ModelError;
use pricer_models::schedules::SimulationGrid;
use thiserror::Error;

/// Failure to build a snapshot from a simulated short rate.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Bond repricing failed (non-finite or invalid interval).
    #[error("step {step}: {source}")]
    Repricing {
        /// Grid step
        step: usize,
        /// Model failure
        #[source]
        source: ModelError,
    },

    /// Repriced bonds do not form a valid curve, e.g. a non-positive
    /// discount factor.
    #[error("step {step}: {source}")]
    Curve {
        /// Grid step
        step: usize,
        /// Curve construction failure
        #[source]
        source: MarketDataError,
    },

    /// Pillar date arithmetic failed.
    #[error("step {step}: {source}")]
    Date {
        /// Grid step
        step: usize,
        /// Date failure
        #[source]
        source: pricer_core::types::DateError,
    },

    /// The step is not a grid point.
    #[error("step {step} is outside the grid of {points} points")]
    StepOutOfRange {
        /// Requested step
        step: usize,
        /// Grid size
        points: usize,
    },

    /// The path does not have one rate per grid point.
    #[error("path has {got} rates, grid has {expected} points")]
    PathLength {
        /// Grid size
        expected: usize,
        /// Rates supplied
        got: usize,
    },
}

/// Builds the discount curve seen at each grid step of one simulated path.
///
/// Snapshot `0` is the market curve. Snapshot `t > 0` is referenced at the
/// grid date `d_t` with pillars `d_t + k·tenor` for `k = 0..=n`; the
/// discount factor at pillar `k` is the Hull-White bond price
/// `P(t_t, t_t + k·dt; r_t)`. Since `P(t, t; r) = 1`, every snapshot
/// discounts its own reference date to one. Each snapshot extrapolates flat
/// forward beyond its last pillar and uses the market curve's day count.
///
/// # Examples
///
/// ```
/// use pricer_xva::PathCurveBuilder;
/// use pricer_core::market_data::curves::{DiscountCurve, YieldCurve};
/// use pricer_core::types::{Date, DayCountConvention};
/// use pricer_models::models::rates::HullWhiteParams;
/// use pricer_models::schedules::SimulationGrid;
///
/// let start = Date::from_ymd(2018, 12, 14).unwrap();
/// let market = DiscountCurve::from_pillars(
///     &[(start, 1.0), (Date::from_ymd(2020, 12, 14).unwrap(), 0.94)],
///     DayCountConvention::ActualActual365,
/// )
/// .unwrap();
/// let grid = SimulationGrid::new(start, Date::from_ymd(2019, 2, 22).unwrap(), "1W".parse().unwrap()).unwrap();
/// let params = HullWhiteParams::new(0.14, 0.008).unwrap();
///
/// let builder = PathCurveBuilder::new(&market, params, &grid);
/// let curves = builder.build(&[0.03; 11]).unwrap();
///
/// assert_eq!(curves.len(), 11);
/// assert_eq!(curves[5].discount_factor(0.0).unwrap(), 1.0);
/// ```
pub struct PathCurveBuilder<'a> {
    market: &'a DiscountCurve<f64>,
    model: HullWhiteModel<'a, DiscountCurve<f64>>,
    grid: &'a SimulationGrid,
}

impl<'a> PathCurveBuilder<'a> {
    /// Creates a builder over the market curve and grid.
    pub fn new(
        market: &'a DiscountCurve<f64>,
        params: HullWhiteParams,
        grid: &'a SimulationGrid,
    ) -> Self {
        Self {
            market,
            model: HullWhiteModel::new(params, market),
            grid,
        }
    }

    /// Snapshot at grid step `step > 0` given the path's short rate there.
    ///
    /// # Errors
    ///
    /// `Repricing` or `Curve` on a bad bond price; `Date` if a pillar date
    /// overflows; `StepOutOfRange` if `step` is not a grid point.
    pub fn snapshot(&self, step: usize, short_rate: f64) -> Result<DiscountCurve<f64>, SnapshotError> {
        let (reference, t) = match (self.grid.dates().get(step), self.grid.times().get(step)) {
            (Some(&reference), Some(&t)) => (reference, t),
            _ => {
                return Err(SnapshotError::StepOutOfRange {
                    step,
                    points: self.grid.size(),
                })
            }
        };
        let dt = self.grid.dt();
        let tenor = self.grid.tenor();

        let pillars = (0..self.grid.size())
            .map(|k| {
                let date = tenor
                    .advance(reference, k as i64)
                    .map_err(|source| SnapshotError::Date { step, source })?;
                let df = self
                    .model
                    .zero_bond(t, t + dt * k as f64, short_rate)
                    .map_err(|source| SnapshotError::Repricing { step, source })?;
                Ok((date, df))
            })
            .collect::<Result<Vec<(Date, f64)>, SnapshotError>>()?;

        DiscountCurve::from_dates(reference, &pillars, self.market.day_count())
            .map_err(|source| SnapshotError::Curve { step, source })
    }

    /// All `n + 1` snapshots for one path.
    pub fn build(&self, path: &[f64]) -> Result<Vec<DiscountCurve<f64>>, SnapshotError> {
        if path.len() != self.grid.size() {
            return Err(SnapshotError::PathLength {
                expected: self.grid.size(),
                got: path.len(),
            });
        }

        let mut curves = Vec::with_capacity(path.len());
        curves.push(self.market.clone());
        for (step, &r) in path.iter().enumerate().skip(1) {
            curves.push(self.snapshot(step, r)?);
        }
        Ok(curves)
    }
}
