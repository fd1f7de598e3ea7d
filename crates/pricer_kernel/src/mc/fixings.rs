//! Simulated index fixings.

use pricer_models::instruments::rates::{FixingTable, RateIndex};
use pricer_models::schedules::SimulationGrid;

use super::error::SimulationError;
use super::paths::ShortRatePaths;

/// Builds the fixing table used to value floating resets that fall inside
/// the simulation horizon.
///
/// Entry `k` is dated `index.fixing_date(grid.dates()[k])` and carries the
/// cross-path mean short rate at grid point `k`. The first entry is replaced
/// by the observed `first_fixing`, since the reset preceding the first grid
/// date is already known.
///
/// # Errors
///
/// * `ShapeMismatch` - the paths were not generated on `grid`
/// * `Date` - a fixing date cannot be represented
///
/// # Examples
///
/// ```rust
/// use pricer_kernel::mc::{simulate_fixings, ShortRatePaths};
/// use pricer_models::instruments::rates::RateIndex;
/// use pricer_models::schedules::SimulationGrid;
/// use pricer_core::types::Date;
///
/// let grid = SimulationGrid::new(
///     Date::from_ymd(2018, 12, 14).unwrap(),
///     Date::from_ymd(2018, 12, 28).unwrap(),
///     "1W".parse().unwrap(),
/// )
/// .unwrap();
/// let paths = ShortRatePaths::from_rows(&[vec![0.02, 0.02, 0.04], vec![0.04, 0.02, 0.02]]).unwrap();
///
/// let table = simulate_fixings(&paths, &grid, RateIndex::UsdLibor3M, 0.0277594).unwrap();
/// assert_eq!(table.len(), 3);
/// assert_eq!(table.get(Date::from_ymd(2018, 12, 12).unwrap()), Some(0.0277594));
/// let last = table.get(Date::from_ymd(2018, 12, 26).unwrap()).unwrap();
/// assert!((last - 0.03).abs() < 1e-15);
/// ```
pub fn simulate_fixings(
    paths: &ShortRatePaths,
    grid: &SimulationGrid,
    index: RateIndex,
    first_fixing: f64,
) -> Result<FixingTable, SimulationError> {
    if paths.n_points() != grid.size() {
        return Err(SimulationError::ShapeMismatch {
            expected: paths.n_paths() * grid.size(),
            got: paths.as_slice().len(),
        });
    }

    let mean = paths.mean_path();
    let mut table = FixingTable::new();
    for (k, (&date, &rate)) in grid.dates().iter().zip(&mean).enumerate() {
        let rate = if k == 0 { first_fixing } else { rate };
        table.insert(index.fixing_date(date)?, rate);
    }
    Ok(table)
}
