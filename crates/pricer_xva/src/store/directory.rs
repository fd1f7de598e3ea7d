use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use pricer_models::instruments::rates::FixingTable;
use tracing::debug;

use super::{ResultStore, StoreStatus};
use crate::error::StoreError;
use crate::io::{read_exposure_row, read_fixings, write_exposure_row, write_fixings, DataError};

const FIXINGS_FILE: &str = "simulated_fixings.csv";
const EXPOSURES_SUFFIX: &str = "_exposures.csv";
const FAILED_SUFFIX: &str = "_failed.txt";

/// Store backed by a directory of CSV files.
///
/// Layout:
/// - `simulated_fixings.csv`
/// - `{path}_exposures.csv`: one comma-separated row
/// - `{path}_failed.txt`: the failure reason
///
/// Every file is written under a hidden temporary name and renamed into
/// place, so a reader never sees a partially written entry.
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Opens (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| data_error(&root, e.into()))?;
        Ok(Self { root })
    }

    /// Store directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn exposures_path(&self, path: usize) -> PathBuf {
        self.root.join(format!("{path}{EXPOSURES_SUFFIX}"))
    }

    fn failure_path(&self, path: usize) -> PathBuf {
        self.root.join(format!("{path}{FAILED_SUFFIX}"))
    }

    fn write_atomic<F>(&self, target: &Path, write: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut BufWriter<File>) -> Result<(), DataError>,
    {
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp = self.root.join(format!(".{name}.tmp"));

        let result = File::create(&tmp)
            .map_err(DataError::from)
            .and_then(|file| {
                let mut writer = BufWriter::new(file);
                write(&mut writer)?;
                writer.flush()?;
                Ok(())
            })
            .and_then(|()| fs::rename(&tmp, target).map_err(DataError::from));

        if let Err(e) = result {
            let _ = fs::remove_file(&tmp);
            return Err(data_error(target, e));
        }
        Ok(())
    }

    fn entries(&self) -> Result<Vec<String>, StoreError> {
        let dir = fs::read_dir(&self.root).map_err(|e| data_error(&self.root, e.into()))?;
        let mut names = Vec::new();
        for entry in dir {
            let entry = entry.map_err(|e| data_error(&self.root, e.into()))?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }
}

fn data_error(path: &Path, source: DataError) -> StoreError {
    StoreError::Data {
        key: path.display().to_string(),
        source,
    }
}

fn path_index(name: &str, suffix: &str) -> Option<usize> {
    name.strip_suffix(suffix)?.parse().ok()
}

fn remove_if_present(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(data_error(path, e.into())),
    }
}

fn open_existing(path: &Path) -> Result<File, StoreError> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StoreError::NotFound {
                key: path.display().to_string(),
            }
        } else {
            data_error(path, e.into())
        }
    })
}

impl ResultStore for DirectoryStore {
    fn clear(&self) -> Result<(), StoreError> {
        let mut removed = 0usize;
        for name in self.entries()? {
            let owned = name == FIXINGS_FILE
                || path_index(&name, EXPOSURES_SUFFIX).is_some()
                || path_index(&name, FAILED_SUFFIX).is_some()
                || (name.starts_with('.') && name.ends_with(".tmp"));
            if owned {
                let path = self.root.join(&name);
                fs::remove_file(&path).map_err(|e| data_error(&path, e.into()))?;
                removed += 1;
            }
        }
        debug!(root = %self.root.display(), removed, "Cleared result store");
        Ok(())
    }

    fn put_fixings(&self, fixings: &FixingTable) -> Result<(), StoreError> {
        let target = self.root.join(FIXINGS_FILE);
        self.write_atomic(&target, |w| write_fixings(w, fixings))
    }

    fn fixings(&self) -> Result<FixingTable, StoreError> {
        let path = self.root.join(FIXINGS_FILE);
        let file = open_existing(&path)?;
        read_fixings(BufReader::new(file)).map_err(|e| data_error(&path, e))
    }

    fn put_exposures(&self, path: usize, values: &[f64]) -> Result<(), StoreError> {
        // stale outcome goes first, so a poller sees the path as pending, never both
        remove_if_present(&self.failure_path(path))?;
        let target = self.exposures_path(path);
        self.write_atomic(&target, |w| write_exposure_row(w, values))
    }

    fn put_failure(&self, path: usize, reason: &str) -> Result<(), StoreError> {
        remove_if_present(&self.exposures_path(path))?;
        let target = self.failure_path(path);
        self.write_atomic(&target, |w| {
            w.write_all(reason.as_bytes())?;
            Ok(())
        })
    }

    fn exposures(&self, path: usize) -> Result<Vec<f64>, StoreError> {
        let file_path = self.exposures_path(path);
        let file = open_existing(&file_path)?;
        read_exposure_row(BufReader::new(file)).map_err(|e| data_error(&file_path, e))
    }

    fn status(&self) -> Result<StoreStatus, StoreError> {
        let mut status = StoreStatus::default();
        for name in self.entries()? {
            if let Some(index) = path_index(&name, EXPOSURES_SUFFIX) {
                status.completed.insert(index);
            } else if let Some(index) = path_index(&name, FAILED_SUFFIX) {
                let path = self.root.join(&name);
                let reason = fs::read_to_string(&path).map_err(|e| data_error(&path, e.into()))?;
                status.failed.insert(index, reason);
            }
        }
        Ok(status)
    }
}
