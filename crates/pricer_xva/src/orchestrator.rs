//! Dispatch, gather and reduction of one exposure run.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use pricer_core::market_data::curves::DiscountCurve;
use pricer_core::types::Date;
use pricer_kernel::mc::ShortRatePaths;
use pricer_models::instruments::rates::{FixingTable, InterestRateSwap};
use pricer_models::models::rates::HullWhiteParams;
use pricer_models::schedules::SimulationGrid;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dispatch::{submit_with_retry, Dispatcher};
use crate::error::ExposureError;
use crate::exposure::{ExposureMatrix, ExposureProfile};
use crate::gather::gather;
use crate::io::DataError;
use crate::store::ResultStore;
use crate::task::{PathTask, PathWorker, WorkUnit};

/// What to do when some paths have not completed at the gather deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPathPolicy {
    /// Reduce over the paths that completed and report the rest.
    Exclude,
    /// Fail the run with the missing and failed indices.
    #[default]
    Fail,
}

impl fmt::Display for MissingPathPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exclude => write!(f, "exclude"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

impl FromStr for MissingPathPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exclude" => Ok(Self::Exclude),
            "fail" => Ok(Self::Fail),
            other => Err(format!("unknown missing path policy '{other}'")),
        }
    }
}

/// Orchestrator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    /// Longest time to wait for results after dispatch.
    pub gather_timeout: Duration,
    /// Delay between store polls.
    pub poll_interval: Duration,
    /// Resubmissions allowed per unit after a rejection.
    pub max_dispatch_retries: u32,
    /// Handling of paths that did not complete.
    pub missing_path_policy: MissingPathPolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            gather_timeout: Duration::from_secs(600),
            poll_interval: Duration::from_millis(100),
            max_dispatch_retries: 3,
            missing_path_policy: MissingPathPolicy::Fail,
        }
    }
}

/// Inputs of one run. Everything here is read-only for the run's duration.
pub struct RunInputs<'a> {
    /// t=0 market curve.
    pub market: Arc<DiscountCurve<f64>>,
    /// Swap to value, with its fixed rate set.
    pub swap: Arc<InterestRateSwap>,
    /// Simulation grid the paths live on.
    pub grid: &'a SimulationGrid,
    /// Hull-White parameters used to simulate the paths.
    pub params: HullWhiteParams,
    /// Simulated short rates, one row per path.
    pub paths: &'a ShortRatePaths,
    /// Simulated index fixings.
    pub fixings: &'a FixingTable,
    /// Fixing pinned at the first reset.
    pub first_index_fixing: f64,
}

/// Result of a run.
#[derive(Debug, Clone)]
pub struct ExposureRun {
    /// Grid dates the profile is reported on.
    pub dates: Vec<Date>,
    /// Grid times in years.
    pub times: Vec<f64>,
    /// Gathered per-path exposures.
    pub matrix: ExposureMatrix,
    /// EPE and ENE per grid date.
    pub profile: ExposureProfile,
    /// Paths that produced no result before the deadline.
    pub missing: Vec<usize>,
    /// Paths whose worker reported a failure.
    pub failed: BTreeMap<usize, String>,
    /// Time spent gathering.
    pub elapsed: Duration,
}

/// Drives one exposure run: publish fixings, dispatch one unit per path,
/// gather the results and reduce them to EPE and ENE.
pub struct ExposureOrchestrator<D: Dispatcher, S: ResultStore + 'static> {
    dispatcher: D,
    store: Arc<S>,
    config: OrchestratorConfig,
}

impl<D: Dispatcher, S: ResultStore + 'static> ExposureOrchestrator<D, S> {
    /// Creates an orchestrator.
    pub fn new(dispatcher: D, store: Arc<S>, config: OrchestratorConfig) -> Self {
        Self {
            dispatcher,
            store,
            config,
        }
    }

    /// Settings in use.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Shared store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Executes the run.
    ///
    /// # Errors
    ///
    /// - `Input` if the paths do not match the grid
    /// - `Store` if the store cannot be cleared, written or polled
    /// - `Dispatch` if a unit is still rejected after every retry
    /// - `IncompleteAggregation` if paths are missing or failed under
    ///   [`MissingPathPolicy::Fail`], or if no path completed at all
    pub fn run(&self, inputs: &RunInputs<'_>) -> Result<ExposureRun, ExposureError> {
        let grid = inputs.grid;
        let n_paths = inputs.paths.n_paths();
        if inputs.paths.n_points() != grid.size() {
            return Err(DataError::Invalid(format!(
                "paths have {} points, grid has {} dates",
                inputs.paths.n_points(),
                grid.size()
            ))
            .into());
        }

        info!(
            paths = n_paths,
            dates = grid.size(),
            policy = %self.config.missing_path_policy,
            "Starting exposure run"
        );

        self.store.clear()?;
        self.store.put_fixings(inputs.fixings)?;

        let store: Arc<dyn ResultStore> = self.store.clone();
        let worker = Arc::new(PathWorker::new(
            Arc::clone(&inputs.market),
            Arc::clone(&inputs.swap),
            store,
        ));

        let mut skipped = 0usize;
        for (index, path) in inputs.paths.iter().enumerate() {
            // a non-finite rate cannot travel in a JSON payload
            if let Some(step) = path.iter().position(|r| !r.is_finite()) {
                let err = ExposureError::Model {
                    path: index,
                    reason: format!("non-finite short rate at step {step}"),
                };
                warn!(path = index, error = %err, "Path not dispatched");
                self.store.put_failure(index, &err.to_string())?;
                skipped += 1;
                continue;
            }

            let task = PathTask {
                simulation_num: index,
                first_index_fixing: inputs.first_index_fixing,
                a: inputs.params.mean_reversion(),
                sigma: inputs.params.volatility(),
                settlement_date: grid.start(),
                end_date: grid.end(),
                grid_step_period: grid.tenor(),
                one_path: path.to_vec(),
            };
            let unit = WorkUnit::new(&task, Arc::clone(&worker))?;
            submit_with_retry(&self.dispatcher, unit, self.config.max_dispatch_retries)?;
        }
        info!(units = n_paths - skipped, skipped, "Dispatched");

        let expected: BTreeSet<usize> = (0..n_paths).collect();
        let outcome = gather(
            self.store.as_ref(),
            &expected,
            self.config.gather_timeout,
            self.config.poll_interval,
        )?;

        if !outcome.is_complete() {
            let incomplete = || ExposureError::IncompleteAggregation {
                expected: n_paths,
                missing: outcome.missing.clone(),
                failed: outcome.failed.keys().copied().collect(),
            };
            match self.config.missing_path_policy {
                MissingPathPolicy::Fail => return Err(incomplete()),
                MissingPathPolicy::Exclude if outcome.rows.is_empty() => return Err(incomplete()),
                MissingPathPolicy::Exclude => warn!(
                    missing = outcome.missing.len(),
                    failed = outcome.failed.len(),
                    completed = outcome.rows.len(),
                    "Excluding incomplete paths from reduction"
                ),
            }
        }

        let matrix = ExposureMatrix::from_rows(outcome.rows)?;
        let profile = ExposureProfile::from_matrix(&matrix);
        info!(
            completed = matrix.n_paths(),
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "Exposure run complete"
        );

        Ok(ExposureRun {
            dates: grid.dates().to_vec(),
            times: grid.times().to_vec(),
            matrix,
            profile,
            missing: outcome.missing,
            failed: outcome.failed,
            elapsed: outcome.elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::tests::FlakyDispatcher;
    use crate::dispatch::InlineDispatcher;
    use crate::store::MemoryStore;
    use crate::test_support::{date, fixings, market, swap};
    use pricer_core::types::Tenor;

    fn grid() -> SimulationGrid {
        let tenor: Tenor = "1W".parse().unwrap();
        SimulationGrid::new(date(2018, 12, 14), date(2019, 2, 22), tenor).unwrap()
    }

    fn params() -> HullWhiteParams {
        HullWhiteParams::new(0.1421842834, 0.0081355969).unwrap()
    }

    fn run_with(
        rows: &[Vec<f64>],
        policy: MissingPathPolicy,
    ) -> Result<ExposureRun, ExposureError> {
        let grid = grid();
        let paths = ShortRatePaths::from_rows(rows).unwrap();
        let fixings = fixings();
        let orchestrator = ExposureOrchestrator::new(
            InlineDispatcher,
            Arc::new(MemoryStore::new()),
            OrchestratorConfig {
                gather_timeout: Duration::from_millis(100),
                poll_interval: Duration::from_millis(10),
                missing_path_policy: policy,
                ..OrchestratorConfig::default()
            },
        );
        orchestrator.run(&RunInputs {
            market: market(),
            swap: swap(),
            grid: &grid,
            params: params(),
            paths: &paths,
            fixings: &fixings,
            first_index_fixing: 0.0277594,
        })
    }

    #[test]
    fn test_complete_run() {
        let rows = vec![vec![0.02; 11], vec![0.03; 11], vec![0.01; 11]];
        let run = run_with(&rows, MissingPathPolicy::Fail).unwrap();

        assert_eq!(run.matrix.n_paths(), 3);
        assert_eq!(run.profile.len(), 11);
        assert_eq!(run.dates.len(), 11);
        assert!(run.missing.is_empty() && run.failed.is_empty());
        for t in 0..11 {
            assert!(run.profile.epe[t] >= 0.0);
            assert!(run.profile.ene[t] <= 0.0);
        }
    }

    #[test]
    fn test_failed_path_fails_run_by_default() {
        let mut bad = vec![0.02; 11];
        bad[3] = f64::NAN;
        let rows = vec![vec![0.02; 11], bad];

        match run_with(&rows, MissingPathPolicy::Fail) {
            Err(ExposureError::IncompleteAggregation {
                expected,
                missing,
                failed,
            }) => {
                assert_eq!(expected, 2);
                assert!(missing.is_empty());
                assert_eq!(failed, vec![1]);
            }
            other => panic!("expected incomplete aggregation, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_path_excluded_on_request() {
        let mut bad = vec![0.02; 11];
        bad[3] = f64::NAN;
        let rows = vec![vec![0.02; 11], bad, vec![0.03; 11]];

        let run = run_with(&rows, MissingPathPolicy::Exclude).unwrap();
        assert_eq!(run.matrix.path_indices(), &[0, 2]);
        assert!(run.failed.contains_key(&1));
    }

    #[test]
    fn test_non_finite_path_is_failed_not_missing() {
        let mut bad = vec![0.02; 11];
        bad[4] = f64::NAN;
        let rows = vec![vec![0.02; 11], bad];

        let run = run_with(&rows, MissingPathPolicy::Exclude).unwrap();
        assert!(run.missing.is_empty());
        assert_eq!(
            run.failed[&1],
            "Model error on path 1: non-finite short rate at step 4"
        );
        assert!(run.elapsed < Duration::from_millis(100));
    }

    #[test]
    fn test_exclude_with_nothing_completed_fails() {
        let mut bad = vec![0.02; 11];
        bad[3] = f64::NAN;
        assert!(matches!(
            run_with(&[bad], MissingPathPolicy::Exclude),
            Err(ExposureError::IncompleteAggregation { .. })
        ));
    }

    #[test]
    fn test_path_grid_mismatch_is_input_error() {
        assert!(matches!(
            run_with(&[vec![0.02; 5]], MissingPathPolicy::Fail),
            Err(ExposureError::Input(_))
        ));
    }

    #[test]
    fn test_dispatch_exhaustion_is_fatal() {
        let grid = grid();
        let paths = ShortRatePaths::from_rows(&[vec![0.02; 11]]).unwrap();
        let fixings = fixings();
        let orchestrator = ExposureOrchestrator::new(
            FlakyDispatcher::new(10),
            Arc::new(MemoryStore::new()),
            OrchestratorConfig {
                max_dispatch_retries: 1,
                ..OrchestratorConfig::default()
            },
        );
        let result = orchestrator.run(&RunInputs {
            market: market(),
            swap: swap(),
            grid: &grid,
            params: params(),
            paths: &paths,
            fixings: &fixings,
            first_index_fixing: 0.0277594,
        });
        assert!(matches!(
            result,
            Err(ExposureError::Dispatch { path: 0, attempts: 2 })
        ));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Exclude".parse::<MissingPathPolicy>().unwrap(), MissingPathPolicy::Exclude);
        assert_eq!(MissingPathPolicy::default(), MissingPathPolicy::Fail);
        assert!("skip".parse::<MissingPathPolicy>().is_err());
    }
}
