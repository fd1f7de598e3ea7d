//! Short-rate path generation under the Hull-White one-factor model.
//!
//! The short rate is split as `r(t) = x(t) + α(t)`, where `x` is a
//! zero-mean Ornstein-Uhlenbeck factor started at `x(0) = 0` and `α` is the
//! deterministic shift that fits the initial curve. The factor is advanced
//! with its exact Gaussian transition over each grid increment:
//!
//! ```text
//! x(t + Δ) = x(t) e^{-aΔ} + σ √((1 - e^{-2aΔ}) / 2a) Z
//! ```
//!
//! so the scheme has no discretisation bias on non-uniform grids.
//!
//! # Memory Layout
//!
//! Paths are stored in row-major order: `rates[path_idx * n_points + step_idx]`
//! where `step_idx = 0` holds `r(0) = f(0, 0)` on every path.

use pricer_core::market_data::curves::YieldCurve;
use pricer_models::models::rates::HullWhiteModel;
use pricer_models::schedules::SimulationGrid;
use tracing::debug;

use super::config::SimulationConfig;
use super::error::SimulationError;
use crate::rng::{NormalSource, PricerRng};

/// Simulated short-rate paths on a grid.
///
/// # Examples
///
/// ```rust
/// use pricer_kernel::mc::ShortRatePaths;
///
/// let paths = ShortRatePaths::from_rows(&[
///     vec![0.02, 0.02, 0.02],
///     vec![0.03, 0.03, 0.03],
///     vec![0.01, 0.01, 0.01],
/// ])
/// .unwrap();
///
/// assert_eq!(paths.n_paths(), 3);
/// assert_eq!(paths.n_points(), 3);
/// assert!((paths.mean_path()[1] - 0.02).abs() < 1e-15);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ShortRatePaths {
    n_paths: usize,
    n_points: usize,
    rates: Vec<f64>,
}

impl ShortRatePaths {
    /// Wraps row-major rate data.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` unless `rates.len() == n_paths * n_points` with both
    /// dimensions non-zero.
    pub fn from_flat(
        n_paths: usize,
        n_points: usize,
        rates: Vec<f64>,
    ) -> Result<Self, SimulationError> {
        let expected = n_paths * n_points;
        if expected == 0 || rates.len() != expected {
            return Err(SimulationError::ShapeMismatch {
                expected,
                got: rates.len(),
            });
        }
        Ok(Self {
            n_paths,
            n_points,
            rates,
        })
    }

    /// Builds paths from one vector per path; all rows must share a length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, SimulationError> {
        let n_points = rows.first().map_or(0, Vec::len);
        let rates: Vec<f64> = rows.iter().flatten().copied().collect();
        if rows.iter().any(|row| row.len() != n_points) {
            return Err(SimulationError::ShapeMismatch {
                expected: rows.len() * n_points,
                got: rates.len(),
            });
        }
        Self::from_flat(rows.len(), n_points, rates)
    }

    /// Number of paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Grid points per path (`steps + 1`).
    #[inline]
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Short rates of path `index`, or `None` if out of range.
    pub fn path(&self, index: usize) -> Option<&[f64]> {
        (index < self.n_paths)
            .then(|| &self.rates[index * self.n_points..(index + 1) * self.n_points])
    }

    /// Iterates paths in index order.
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.rates.chunks_exact(self.n_points)
    }

    /// Row-major view of all rates.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.rates
    }

    /// Cross-path mean short rate at each grid point.
    pub fn mean_path(&self) -> Vec<f64> {
        let mut mean = vec![0.0; self.n_points];
        for path in self.iter() {
            for (acc, r) in mean.iter_mut().zip(path) {
                *acc += r;
            }
        }
        let n = self.n_paths as f64;
        mean.iter_mut().for_each(|m| *m /= n);
        mean
    }
}

/// Generates Hull-White short-rate paths on a [`SimulationGrid`].
///
/// Generation is single-threaded and driven by one random stream, so a
/// fixed seed reproduces the same paths regardless of how the downstream
/// valuation is parallelised.
pub struct ShortRatePathGenerator<'a, C: YieldCurve<f64> + ?Sized> {
    model: HullWhiteModel<'a, C>,
    grid: &'a SimulationGrid,
    config: SimulationConfig,
}

impl<'a, C: YieldCurve<f64> + ?Sized> ShortRatePathGenerator<'a, C> {
    /// Creates a generator.
    pub fn new(model: HullWhiteModel<'a, C>, grid: &'a SimulationGrid, config: SimulationConfig) -> Self {
        Self {
            model,
            grid,
            config,
        }
    }

    /// Simulation configuration.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Generates all paths with a [`PricerRng`] seeded from the config,
    /// falling back to an entropy seed when none is set.
    ///
    /// Returns the paths together with the seed actually used.
    pub fn generate(&self) -> Result<(ShortRatePaths, u64), SimulationError> {
        let mut rng = match self.config.seed() {
            Some(seed) => PricerRng::from_seed(seed),
            None => PricerRng::from_entropy(),
        };
        let paths = self.generate_with(&mut rng)?;
        Ok((paths, rng.seed()))
    }

    /// Generates all paths drawing normals from `source`.
    ///
    /// Draws are consumed path by path, step by step.
    ///
    /// # Errors
    ///
    /// * `Config` - invalid path count
    /// * `Model` - the initial curve cannot be evaluated on the grid
    /// * `NonFiniteDraw` / `NonFiniteRate` - the whole generation is aborted
    pub fn generate_with<R: NormalSource>(
        &self,
        source: &mut R,
    ) -> Result<ShortRatePaths, SimulationError> {
        self.config.validate()?;

        let n_paths = self.config.n_paths();
        let n_points = self.grid.size();
        let steps = self.grid.steps();

        let alphas = self
            .grid
            .times()
            .iter()
            .map(|&t| self.model.alpha(t))
            .collect::<Result<Vec<_>, _>>()?;
        let increments: Vec<f64> = self.grid.increments().collect();

        debug!(
            model = HullWhiteModel::<C>::model_name(),
            n_paths,
            steps,
            r0 = alphas[0],
            "generating short-rate paths"
        );

        let mut rates = vec![0.0; n_paths * n_points];
        let mut normals = vec![0.0; steps];

        for (path, row) in rates.chunks_exact_mut(n_points).enumerate() {
            source.fill_normal(&mut normals);

            row[0] = alphas[0];
            let mut x = 0.0;
            for k in 0..steps {
                let z = normals[k];
                if !z.is_finite() {
                    return Err(SimulationError::NonFiniteDraw { path, step: k + 1 });
                }
                x = self.model.evolve_factor(x, increments[k], z);
                let r = x + alphas[k + 1];
                if !r.is_finite() {
                    return Err(SimulationError::NonFiniteRate { path, step: k + 1 });
                }
                row[k + 1] = r;
            }
        }

        ShortRatePaths::from_flat(n_paths, n_points, rates)
    }
}
