use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use pricer_models::instruments::rates::FixingTable;

use super::{ResultStore, StoreStatus};
use crate::error::StoreError;

#[derive(Default)]
struct Entries {
    fixings: Option<FixingTable>,
    exposures: BTreeMap<usize, Vec<f64>>,
    failures: BTreeMap<usize, String>,
}

/// In-process store behind a single mutex.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<Entries>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Entries>, StoreError> {
        self.entries.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl ResultStore for MemoryStore {
    fn clear(&self) -> Result<(), StoreError> {
        *self.lock()? = Entries::default();
        Ok(())
    }

    fn put_fixings(&self, fixings: &FixingTable) -> Result<(), StoreError> {
        self.lock()?.fixings = Some(fixings.clone());
        Ok(())
    }

    fn fixings(&self) -> Result<FixingTable, StoreError> {
        self.lock()?
            .fixings
            .clone()
            .ok_or_else(|| StoreError::NotFound {
                key: "fixings".to_string(),
            })
    }

    fn put_exposures(&self, path: usize, values: &[f64]) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        entries.failures.remove(&path);
        entries.exposures.insert(path, values.to_vec());
        Ok(())
    }

    fn put_failure(&self, path: usize, reason: &str) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        entries.exposures.remove(&path);
        entries.failures.insert(path, reason.to_string());
        Ok(())
    }

    fn exposures(&self, path: usize) -> Result<Vec<f64>, StoreError> {
        self.lock()?
            .exposures
            .get(&path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                key: format!("exposures/{path}"),
            })
    }

    fn status(&self) -> Result<StoreStatus, StoreError> {
        let entries = self.lock()?;
        Ok(StoreStatus {
            completed: entries.exposures.keys().copied().collect(),
            failed: entries.failures.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_core::types::Date;

    #[test]
    fn test_fixings_round_trip() {
        let store = MemoryStore::new();
        assert!(matches!(store.fixings(), Err(StoreError::NotFound { .. })));

        let table: FixingTable = [(Date::from_ymd(2018, 12, 12).unwrap(), 0.0277594)]
            .into_iter()
            .collect();
        store.put_fixings(&table).unwrap();
        assert_eq!(store.fixings().unwrap(), table);
    }

    #[test]
    fn test_status_tracks_both_outcomes() {
        let store = MemoryStore::new();
        store.put_exposures(0, &[1.0, 2.0]).unwrap();
        store.put_failure(2, "non-finite swap NPV").unwrap();

        let status = store.status().unwrap();
        assert!(status.is_observed(0));
        assert!(!status.is_observed(1));
        assert!(status.is_observed(2));
        assert_eq!(status.failed[&2], "non-finite swap NPV");
        assert_eq!(store.exposures(0).unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_latest_outcome_wins() {
        let store = MemoryStore::new();
        store.put_failure(0, "Store entry 'fixings' not found").unwrap();
        store.put_exposures(0, &[1.0]).unwrap();

        let status = store.status().unwrap();
        assert!(status.completed.contains(&0));
        assert!(status.failed.is_empty());

        store.put_failure(0, "non-finite swap NPV").unwrap();
        let status = store.status().unwrap();
        assert!(status.completed.is_empty());
        assert_eq!(status.failed[&0], "non-finite swap NPV");
    }

    #[test]
    fn test_clear_drops_everything() {
        let store = MemoryStore::new();
        store.put_exposures(0, &[1.0]).unwrap();
        store.put_failure(1, "boom").unwrap();
        store.clear().unwrap();

        assert_eq!(store.status().unwrap(), StoreStatus::default());
        assert!(store.exposures(0).is_err());
    }
}
