//! Result collection with a deadline.

use std::collections::{BTreeMap, BTreeSet};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::store::{ResultStore, StoreStatus};

/// What a gather observed by the time it returned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GatherOutcome {
    /// Exposure rows of completed paths, by path index.
    pub rows: BTreeMap<usize, Vec<f64>>,
    /// Expected paths with no result at the deadline.
    pub missing: Vec<usize>,
    /// Paths whose worker published a failure, with its reason.
    pub failed: BTreeMap<usize, String>,
    /// Time spent gathering.
    pub elapsed: Duration,
}

impl GatherOutcome {
    /// Whether every expected path completed.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.failed.is_empty()
    }
}

/// Polls `store` until every path in `expected` is observed or `timeout`
/// elapses, then reads the completed rows.
///
/// A failed path counts as observed. Rows are returned as found; nothing is
/// padded for missing or failed paths.
///
/// # Errors
///
/// Store failures while polling or reading.
pub fn gather<S: ResultStore + ?Sized>(
    store: &S,
    expected: &BTreeSet<usize>,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<GatherOutcome, StoreError> {
    let started = Instant::now();
    let deadline = started + timeout;

    let status = loop {
        let status = store.status()?;
        let pending = expected.iter().filter(|&&p| !status.is_observed(p)).count();
        if pending == 0 {
            break status;
        }

        let now = Instant::now();
        if now >= deadline {
            warn!(pending, expected = expected.len(), "Gather timed out");
            break status;
        }
        debug!(pending, "Waiting for paths");
        thread::sleep(poll_interval.min(deadline - now));
    };

    collect(store, expected, status, started.elapsed())
}

fn collect<S: ResultStore + ?Sized>(
    store: &S,
    expected: &BTreeSet<usize>,
    status: StoreStatus,
    elapsed: Duration,
) -> Result<GatherOutcome, StoreError> {
    let mut outcome = GatherOutcome {
        elapsed,
        ..GatherOutcome::default()
    };

    for &path in expected {
        if let Some(reason) = status.failed.get(&path) {
            outcome.failed.insert(path, reason.clone());
        } else if status.completed.contains(&path) {
            outcome.rows.insert(path, store.exposures(path)?);
        } else {
            outcome.missing.push(path);
        }
    }
    Ok(outcome)
}
