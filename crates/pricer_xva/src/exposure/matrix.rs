use std::collections::BTreeMap;

use crate::io::DataError;

/// Gathered exposures, one row per path and one column per grid date.
///
/// # Memory Layout
///
/// ```text
/// paths:   [p0, p1, ..., pm]
/// values:  [v(p0,t0), ..., v(p0,tn), v(p1,t0), ..., v(pm,tn)]
/// ```
///
/// Rows are kept in ascending path index order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureMatrix {
    paths: Vec<usize>,
    n_times: usize,
    values: Vec<f64>,
}

impl ExposureMatrix {
    /// Builds the matrix from path-indexed rows.
    ///
    /// # Errors
    ///
    /// `Invalid` if there are no rows, a row is empty, or the rows differ
    /// in length.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use pricer_xva::exposure::ExposureMatrix;
    ///
    /// let rows = BTreeMap::from([(0, vec![1.0, 2.0]), (3, vec![-1.0, 4.0])]);
    /// let matrix = ExposureMatrix::from_rows(rows).unwrap();
    ///
    /// assert_eq!(matrix.path_indices(), &[0, 3]);
    /// assert_eq!(matrix.column(1).collect::<Vec<_>>(), vec![2.0, 4.0]);
    /// ```
    pub fn from_rows(rows: BTreeMap<usize, Vec<f64>>) -> Result<Self, DataError> {
        let n_times = match rows.values().next() {
            Some(first) if !first.is_empty() => first.len(),
            Some(_) => return Err(DataError::Invalid("empty exposure row".to_string())),
            None => return Err(DataError::Invalid("no exposure rows".to_string())),
        };

        let mut paths = Vec::with_capacity(rows.len());
        let mut values = Vec::with_capacity(rows.len() * n_times);
        for (path, row) in rows {
            if row.len() != n_times {
                return Err(DataError::Invalid(format!(
                    "path {path} has {} exposures, expected {n_times}",
                    row.len()
                )));
            }
            paths.push(path);
            values.extend(row);
        }

        Ok(Self {
            paths,
            n_times,
            values,
        })
    }

    /// Number of paths (rows).
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.paths.len()
    }

    /// Number of grid dates (columns).
    #[inline]
    pub fn n_times(&self) -> usize {
        self.n_times
    }

    /// Path index of each row.
    #[inline]
    pub fn path_indices(&self) -> &[usize] {
        &self.paths
    }

    /// Row `row` (not path index `row`).
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        let start = row.checked_mul(self.n_times)?;
        self.values.get(start..start + self.n_times)
    }

    /// Row holding path index `path`.
    pub fn path(&self, path: usize) -> Option<&[f64]> {
        let row = self.paths.binary_search(&path).ok()?;
        self.row(row)
    }

    /// Values at grid date `t` across all paths.
    pub fn column(&self, t: usize) -> impl Iterator<Item = f64> + '_ {
        let n_times = self.n_times;
        self.values
            .iter()
            .skip(t)
            .step_by(n_times)
            .take(if t < n_times { self.paths.len() } else { 0 })
            .copied()
    }
}
