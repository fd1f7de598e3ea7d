//! Self-contained units of work, one per simulated path.

use std::sync::Arc;

use pricer_core::market_data::curves::DiscountCurve;
use pricer_core::types::{Date, Tenor};
use pricer_models::instruments::rates::InterestRateSwap;
use pricer_models::instruments::InstrumentError;
use pricer_models::models::rates::HullWhiteParams;
use pricer_models::schedules::SimulationGrid;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ExposureError;
use crate::io::DataError;
use crate::path_curves::PathCurveBuilder;
use crate::store::ResultStore;
use crate::valuation::InstrumentValuer;

/// Everything a worker needs to value one path, besides the shared market
/// curve, swap and store.
///
/// Travels as JSON so that a unit can be handed to any executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathTask {
    /// Path index, also the key of the result.
    pub simulation_num: usize,
    /// Index fixing pinned at the first reset.
    pub first_index_fixing: f64,
    /// Hull-White mean reversion.
    pub a: f64,
    /// Hull-White volatility.
    pub sigma: f64,
    /// Grid start.
    pub settlement_date: Date,
    /// Grid end.
    pub end_date: Date,
    /// Grid step.
    pub grid_step_period: Tenor,
    /// Short rate at every grid date.
    pub one_path: Vec<f64>,
}

impl PathTask {
    /// Serialises the task.
    pub fn to_json(&self) -> Result<String, DataError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a task written by [`PathTask::to_json`].
    pub fn from_json(payload: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(payload)?)
    }
}

/// Values paths and publishes the results.
///
/// Holds only read-only shared state, so one worker serves every unit of a
/// run from any thread.
pub struct PathWorker {
    market: Arc<DiscountCurve<f64>>,
    swap: Arc<InterestRateSwap>,
    store: Arc<dyn ResultStore>,
}

impl PathWorker {
    /// Creates a worker.
    pub fn new(
        market: Arc<DiscountCurve<f64>>,
        swap: Arc<InterestRateSwap>,
        store: Arc<dyn ResultStore>,
    ) -> Self {
        Self {
            market,
            swap,
            store,
        }
    }

    /// Values the path described by `payload` and publishes the outcome.
    ///
    /// A path-scoped failure is published to the store as that path's
    /// result before being returned. Returns the path index on success.
    ///
    /// # Errors
    ///
    /// `Input` for a malformed payload, `FixingResolution` or `Model` for
    /// a failed path, `Store` if the outcome cannot be published.
    pub fn process(&self, payload: &str) -> Result<usize, ExposureError> {
        let task = PathTask::from_json(payload)?;
        self.process_task(&task)
    }

    /// As [`PathWorker::process`], for a payload already known to belong to
    /// `path`. A payload that cannot be parsed is published as that path's
    /// failure, so the slot never stays empty.
    pub fn process_path(&self, path: usize, payload: &str) -> Result<usize, ExposureError> {
        match PathTask::from_json(payload) {
            Ok(task) => self.process_task(&task),
            Err(err) => self.publish_failure(path, err.into()),
        }
    }

    /// Values an already parsed task and publishes the outcome.
    pub fn process_task(&self, task: &PathTask) -> Result<usize, ExposureError> {
        let path = task.simulation_num;
        match self.value(task) {
            Ok(exposures) => {
                self.store.put_exposures(path, &exposures)?;
                debug!(path, steps = exposures.len(), "Path valued");
                Ok(path)
            }
            Err(err) => self.publish_failure(path, err),
        }
    }

    fn publish_failure(&self, path: usize, err: ExposureError) -> Result<usize, ExposureError> {
        warn!(path, error = %err, "Path failed");
        self.store.put_failure(path, &err.to_string())?;
        Err(err)
    }

    fn value(&self, task: &PathTask) -> Result<Vec<f64>, ExposureError> {
        let path = task.simulation_num;
        let model_error = |reason: String| ExposureError::Model { path, reason };

        if let Some(step) = task.one_path.iter().position(|r| !r.is_finite()) {
            return Err(model_error(format!("non-finite short rate at step {step}")));
        }

        let grid = SimulationGrid::new(task.settlement_date, task.end_date, task.grid_step_period)
            .map_err(DataError::from)?;
        let params = HullWhiteParams::new(task.a, task.sigma).map_err(|e| model_error(e.to_string()))?;

        let mut fixings = self.store.fixings()?;
        let first_reset = self
            .swap
            .floating_leg()
            .index()
            .fixing_date(task.settlement_date)
            .map_err(DataError::from)?;
        fixings.insert(first_reset, task.first_index_fixing);

        let valuer = InstrumentValuer::new(&self.swap, &fixings)
            .map_err(|e| instrument_error(path, e))?;
        let curves = PathCurveBuilder::new(&self.market, params, &grid)
            .build(&task.one_path)
            .map_err(|e| model_error(e.to_string()))?;
        let exposures = valuer
            .value_path(grid.dates(), &curves)
            .map_err(|e| instrument_error(path, e))?;

        if let Some(step) = exposures.iter().position(|v| !v.is_finite()) {
            return Err(model_error(format!("non-finite exposure at step {step}")));
        }
        Ok(exposures)
    }
}

fn instrument_error(path: usize, err: InstrumentError) -> ExposureError {
    match err {
        InstrumentError::Fixing(source) => ExposureError::FixingResolution { path, source },
        other => ExposureError::Model {
            path,
            reason: other.to_string(),
        },
    }
}

/// A serialised [`PathTask`] bound to the worker that will run it.
#[derive(Clone)]
pub struct WorkUnit {
    path: usize,
    payload: String,
    worker: Arc<PathWorker>,
}

impl WorkUnit {
    /// Serialises `task` for `worker`.
    pub fn new(task: &PathTask, worker: Arc<PathWorker>) -> Result<Self, DataError> {
        Ok(Self {
            path: task.simulation_num,
            payload: task.to_json()?,
            worker,
        })
    }

    /// Path index of the task.
    pub fn path(&self) -> usize {
        self.path
    }

    /// JSON payload.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Runs the unit on the calling thread.
    ///
    /// Every outcome, including an unreadable payload, lands in the store
    /// under [`WorkUnit::path`]. Running a unit again overwrites it.
    pub fn run(&self) -> Result<usize, ExposureError> {
        self.worker.process_path(self.path, &self.payload)
    }
}

impl std::fmt::Debug for WorkUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkUnit")
            .field("path", &self.path)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_support::{market, swap, task, worker};

    #[test]
    fn test_payload_round_trip() {
        let original = task(3, 0.02);
        let parsed = PathTask::from_json(&original.to_json().unwrap()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_unit_publishes_exposures() {
        let (worker, store) = worker();
        let unit = WorkUnit::new(&task(1, 0.02), worker).unwrap();

        assert_eq!(unit.run().unwrap(), 1);
        let exposures = store.exposures(1).unwrap();
        assert_eq!(exposures.len(), 11);
        assert!(exposures.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_wrong_path_length_is_published_as_failure() {
        let (worker, store) = worker();
        let mut bad = task(5, 0.02);
        bad.one_path.pop();
        let unit = WorkUnit::new(&bad, worker).unwrap();

        let err = unit.run().unwrap_err();
        assert_eq!(err.path(), Some(5));
        assert!(store.status().unwrap().failed.contains_key(&5));
    }

    #[test]
    fn test_missing_fixings_is_store_error() {
        let store = Arc::new(MemoryStore::new());
        let worker = Arc::new(PathWorker::new(market(), swap(), store));
        let unit = WorkUnit::new(&task(0, 0.02), worker).unwrap();

        assert!(matches!(unit.run(), Err(ExposureError::Store(_))));
    }

    #[test]
    fn test_malformed_payload_is_input_error() {
        let (worker, _) = worker();
        assert!(matches!(
            worker.process("{\"simulation_num\": 1}"),
            Err(ExposureError::Input(DataError::Json(_)))
        ));
    }

    #[test]
    fn test_unreadable_payload_is_published_for_its_path() {
        let (worker, store) = worker();
        let err = worker.process_path(4, "{\"simulation_num\": 4}").unwrap_err();

        assert!(matches!(err, ExposureError::Input(DataError::Json(_))));
        let status = store.status().unwrap();
        assert!(status.failed.contains_key(&4));
        assert!(status.completed.is_empty());
    }

    #[test]
    fn test_non_finite_rate_is_model_failure() {
        let (worker, store) = worker();
        let mut bad = task(6, 0.02);
        bad.one_path[3] = f64::INFINITY;

        match worker.process_task(&bad) {
            Err(ExposureError::Model { path, reason }) => {
                assert_eq!(path, 6);
                assert!(reason.contains("step 3"));
            }
            other => panic!("expected model error, got {other:?}"),
        }
        assert!(store.status().unwrap().failed.contains_key(&6));
    }

    #[test]
    fn test_nan_path_unit_is_recorded_as_failed() {
        // NaN serialises to null and no longer parses as a rate
        let (worker, store) = worker();
        let mut bad = task(2, 0.02);
        bad.one_path[3] = f64::NAN;
        let unit = WorkUnit::new(&bad, worker).unwrap();

        assert!(unit.run().is_err());
        let status = store.status().unwrap();
        assert!(status.failed.contains_key(&2));
        assert!(!status.completed.contains(&2));
    }

    #[test]
    fn test_rerun_after_failure_replaces_failure() {
        let store = Arc::new(MemoryStore::new());
        let worker = Arc::new(PathWorker::new(market(), swap(), store.clone()));
        let unit = WorkUnit::new(&task(0, 0.02), worker).unwrap();

        assert!(unit.run().is_err());
        assert!(store.status().unwrap().failed.contains_key(&0));

        store.put_fixings(&crate::test_support::fixings()).unwrap();
        assert_eq!(unit.run().unwrap(), 0);
        let status = store.status().unwrap();
        assert!(status.completed.contains(&0));
        assert!(status.failed.is_empty());
    }
}
