//! Shared result store.
//!
//! Workers publish one entry per path, either an exposure vector or a
//! failure reason; the orchestrator publishes the simulated fixing table
//! before dispatch and polls for completion afterwards.

mod directory;
mod memory;

pub use directory::DirectoryStore;
pub use memory::MemoryStore;

use std::collections::{BTreeMap, BTreeSet};

use pricer_models::instruments::rates::FixingTable;

use crate::error::StoreError;

/// Paths observed in the store at one poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatus {
    /// Paths with a published exposure vector.
    pub completed: BTreeSet<usize>,
    /// Paths whose worker published a failure, with its reason.
    pub failed: BTreeMap<usize, String>,
}

impl StoreStatus {
    /// Whether `path` has reached a terminal state.
    pub fn is_observed(&self, path: usize) -> bool {
        self.completed.contains(&path) || self.failed.contains_key(&path)
    }
}

/// Storage shared between the orchestrator and its workers.
///
/// Implementations must be safe to write from many workers at once and
/// must make an entry visible to [`ResultStore::status`] only once it is
/// complete.
pub trait ResultStore: Send + Sync {
    /// Removes every entry left by a previous run.
    fn clear(&self) -> Result<(), StoreError>;

    /// Publishes the simulated fixing table.
    fn put_fixings(&self, fixings: &FixingTable) -> Result<(), StoreError>;

    /// The simulated fixing table.
    ///
    /// # Errors
    ///
    /// `NotFound` if no table has been published.
    fn fixings(&self) -> Result<FixingTable, StoreError>;

    /// Publishes the exposure vector of one path, replacing any failure
    /// recorded for it by an earlier run of the same unit.
    fn put_exposures(&self, path: usize, values: &[f64]) -> Result<(), StoreError>;

    /// Publishes a failure for one path, replacing any exposures recorded
    /// for it earlier.
    fn put_failure(&self, path: usize, reason: &str) -> Result<(), StoreError>;

    /// The exposure vector of one path.
    ///
    /// # Errors
    ///
    /// `NotFound` if the path has not completed.
    fn exposures(&self, path: usize) -> Result<Vec<f64>, StoreError>;

    /// Paths currently observed.
    fn status(&self) -> Result<StoreStatus, StoreError>;
}
