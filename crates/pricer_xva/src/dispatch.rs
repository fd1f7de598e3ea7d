//! Work unit dispatch.
//!
//! A [`Dispatcher`] only accepts units; results come back through the
//! [`ResultStore`](crate::store::ResultStore), never through the
//! dispatcher, so the orchestrator never blocks on an individual unit.

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::ExposureError;
use crate::task::WorkUnit;

/// A unit could not be accepted for execution.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The worker pool could not be built.
    #[error("Worker pool error: {0}")]
    Pool(#[from] ThreadPoolBuildError),

    /// The executor refused the unit.
    #[error("Unit rejected: {0}")]
    Rejected(String),
}

/// Accepts units of work for asynchronous execution.
pub trait Dispatcher: Send + Sync {
    /// Hands `unit` to the executor.
    fn submit(&self, unit: WorkUnit) -> Result<(), DispatchError>;
}

/// Runs each unit on the submitting thread before returning.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineDispatcher;

impl Dispatcher for InlineDispatcher {
    fn submit(&self, unit: WorkUnit) -> Result<(), DispatchError> {
        run_logged(&unit);
        Ok(())
    }
}

/// Fire-and-continue execution on a dedicated rayon pool.
pub struct RayonDispatcher {
    pool: ThreadPool,
}

impl RayonDispatcher {
    /// Pool with `num_threads` workers; `0` lets rayon choose.
    pub fn new(num_threads: usize) -> Result<Self, DispatchError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("exposure-worker-{i}"))
            .build()?;
        Ok(Self { pool })
    }

    /// Number of worker threads.
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl Dispatcher for RayonDispatcher {
    fn submit(&self, unit: WorkUnit) -> Result<(), DispatchError> {
        self.pool.spawn(move || run_logged(&unit));
        Ok(())
    }
}

/// Runs `unit`; its outcome is already in the store, so an error is only logged.
fn run_logged(unit: &WorkUnit) {
    if let Err(err) = unit.run() {
        warn!(path = unit.path(), error = %err, "Work unit failed");
    }
}

/// Submits `unit`, retrying up to `max_retries` times on rejection.
///
/// # Errors
///
/// `Dispatch` once `1 + max_retries` attempts have all been rejected.
pub fn submit_with_retry<D: Dispatcher + ?Sized>(
    dispatcher: &D,
    unit: WorkUnit,
    max_retries: u32,
) -> Result<(), ExposureError> {
    let path = unit.path();
    let attempts = max_retries.saturating_add(1);
    for attempt in 1..=attempts {
        match dispatcher.submit(unit.clone()) {
            Ok(()) => {
                if attempt > 1 {
                    debug!(path, attempt, "Dispatch succeeded after retry");
                }
                return Ok(());
            }
            Err(err) => warn!(path, attempt, error = %err, "Dispatch rejected"),
        }
    }
    Err(ExposureError::Dispatch { path, attempts })
}
