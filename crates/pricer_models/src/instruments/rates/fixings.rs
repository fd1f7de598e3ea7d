//! Index fixing table with nearest-date resolution.

use pricer_core::types::Date;
use std::collections::BTreeMap;
use thiserror::Error;

/// Fixing resolution errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FixingError {
    /// The table holds no fixings at all.
    #[error("No fixing available for {date}: fixing table is empty")]
    EmptyTable {
        /// The reset date that could not be resolved
        date: Date,
    },
}

/// Ordered map from fixing date to rate.
///
/// [`FixingTable::resolve`] is total on a non-empty table: an exact date
/// match wins; otherwise the closest date by absolute calendar distance is
/// used, and on a tie the earlier date wins.
///
/// # Examples
///
/// ```
/// use pricer_models::instruments::rates::FixingTable;
/// use pricer_core::types::Date;
///
/// let d = |day| Date::from_ymd(2019, 1, day).unwrap();
/// let table: FixingTable = [(d(1), 0.020), (d(5), 0.030)].into_iter().collect();
///
/// assert_eq!(table.resolve(d(1)).unwrap(), 0.020);
/// assert_eq!(table.resolve(d(4)).unwrap(), 0.030);
/// // d(3) is two days from each neighbour: the earlier date wins
/// assert_eq!(table.resolve(d(3)).unwrap(), 0.020);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixingTable {
    fixings: BTreeMap<Date, f64>,
}

impl FixingTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a fixing, returning the previous rate.
    pub fn insert(&mut self, date: Date, rate: f64) -> Option<f64> {
        self.fixings.insert(date, rate)
    }

    /// Exact-date lookup.
    pub fn get(&self, date: Date) -> Option<f64> {
        self.fixings.get(&date).copied()
    }

    /// Number of fixings.
    pub fn len(&self) -> usize {
        self.fixings.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.fixings.is_empty()
    }

    /// Iterates fixings in date order.
    pub fn iter(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.fixings.iter().map(|(d, r)| (*d, *r))
    }

    /// Resolves the rate for `date`: exact match, else nearest date.
    ///
    /// # Errors
    ///
    /// `FixingError::EmptyTable` if the table has no entries.
    pub fn resolve(&self, date: Date) -> Result<f64, FixingError> {
        let before = self.fixings.range(..=date).next_back();
        let after = self.fixings.range(date..).next();

        let resolved = match (before, after) {
            (Some((d_before, r_before)), Some((d_after, r_after))) => {
                if date - *d_before <= *d_after - date {
                    *r_before
                } else {
                    *r_after
                }
            }
            (Some((_, r)), None) | (None, Some((_, r))) => *r,
            (None, None) => return Err(FixingError::EmptyTable { date }),
        };
        Ok(resolved)
    }
}

impl FromIterator<(Date, f64)> for FixingTable {
    fn from_iter<I: IntoIterator<Item = (Date, f64)>>(iter: I) -> Self {
        Self {
            fixings: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn weekly_table() -> FixingTable {
        [
            (date(2018, 12, 12), 0.0277594),
            (date(2018, 12, 19), 0.0281),
            (date(2018, 12, 26), 0.0284),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_exact_match() {
        let table = weekly_table();
        assert_eq!(table.resolve(date(2018, 12, 19)).unwrap(), 0.0281);
    }

    #[test]
    fn test_nearest_neighbour() {
        let table = weekly_table();
        assert_eq!(table.resolve(date(2018, 12, 17)).unwrap(), 0.0281);
        assert_eq!(table.resolve(date(2018, 12, 14)).unwrap(), 0.0277594);
    }

    #[test]
    fn test_tie_resolves_to_earlier_date() {
        let table: FixingTable = [(date(2019, 3, 10), 0.01), (date(2019, 3, 14), 0.02)]
            .into_iter()
            .collect();
        assert_eq!(table.resolve(date(2019, 3, 12)).unwrap(), 0.01);
    }

    #[test]
    fn test_outside_table_range_clamps() {
        let table = weekly_table();
        assert_eq!(table.resolve(date(2017, 1, 1)).unwrap(), 0.0277594);
        assert_eq!(table.resolve(date(2030, 1, 1)).unwrap(), 0.0284);
    }

    #[test]
    fn test_empty_table_fails() {
        let table = FixingTable::new();
        assert_eq!(
            table.resolve(date(2019, 1, 1)),
            Err(FixingError::EmptyTable {
                date: date(2019, 1, 1)
            })
        );
    }

    #[test]
    fn test_insert_overwrites() {
        let mut table = weekly_table();
        assert_eq!(table.insert(date(2018, 12, 12), 0.03), Some(0.0277594));
        assert_eq!(table.get(date(2018, 12, 12)), Some(0.03));
        assert_eq!(table.len(), 3);
    }
}
