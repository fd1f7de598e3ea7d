use rayon::prelude::*;

use super::ExposureMatrix;

/// Exposure metrics over a gathered [`ExposureMatrix`].
///
/// Every per-date metric averages over the rows actually present in the
/// matrix; missing paths are never padded.
pub struct ExposureCalculator;

impl ExposureCalculator {
    /// Expected Positive Exposure at each grid date.
    ///
    /// EPE(t) = E[max(V(t), 0)]
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use pricer_xva::exposure::{ExposureCalculator, ExposureMatrix};
    ///
    /// let matrix = ExposureMatrix::from_rows(BTreeMap::from([
    ///     (0, vec![10.0, 20.0]),
    ///     (1, vec![5.0, -10.0]),
    ///     (2, vec![-5.0, 15.0]),
    /// ]))
    /// .unwrap();
    ///
    /// let epe = ExposureCalculator::expected_positive_exposure(&matrix);
    /// // t=0: (10 + 5 + 0) / 3
    /// assert_eq!(epe[0], 5.0);
    /// ```
    pub fn expected_positive_exposure(matrix: &ExposureMatrix) -> Vec<f64> {
        Self::column_mean(matrix, |v| v.max(0.0))
    }

    /// Expected Negative Exposure at each grid date, as a signed value.
    ///
    /// ENE(t) = E[min(V(t), 0)] <= 0
    pub fn expected_negative_exposure(matrix: &ExposureMatrix) -> Vec<f64> {
        Self::column_mean(matrix, |v| v.min(0.0))
    }

    /// Mean mark-to-market at each grid date.
    pub fn mean_exposure(matrix: &ExposureMatrix) -> Vec<f64> {
        Self::column_mean(matrix, |v| v)
    }

    /// Potential Future Exposure at each grid date.
    ///
    /// PFE(t, α) = Quantile_α(max(V(t), 0)), taking the order statistic at
    /// `round((n - 1) * α)`.
    pub fn potential_future_exposure(matrix: &ExposureMatrix, confidence: f64) -> Vec<f64> {
        let n_paths = matrix.n_paths();
        let confidence = confidence.clamp(0.0, 1.0);
        let quantile_idx = (((n_paths as f64 - 1.0) * confidence).round() as usize).min(n_paths - 1);

        (0..matrix.n_times())
            .into_par_iter()
            .map(|t| {
                let mut exposures: Vec<f64> = matrix.column(t).map(|v| v.max(0.0)).collect();
                exposures.sort_by(f64::total_cmp);
                exposures[quantile_idx]
            })
            .collect()
    }

    /// Time-weighted average of a profile by trapezoidal integration.
    ///
    /// Returns the first value when the grid spans no time, and `0.0` for
    /// an empty profile.
    ///
    /// ```
    /// use pricer_xva::exposure::ExposureCalculator;
    ///
    /// let profile = [0.0, 10.0, 20.0, 15.0, 5.0];
    /// let times = [0.0, 0.25, 0.5, 0.75, 1.0];
    /// assert_eq!(ExposureCalculator::time_weighted_average(&profile, &times), 11.875);
    /// ```
    pub fn time_weighted_average(profile: &[f64], times: &[f64]) -> f64 {
        let first = profile.first().copied().unwrap_or(0.0);
        if times.len() < 2 || profile.len() != times.len() {
            return first;
        }

        let integral: f64 = profile
            .windows(2)
            .zip(times.windows(2))
            .map(|(v, t)| 0.5 * (v[0] + v[1]) * (t[1] - t[0]))
            .sum();

        let total_time = times[times.len() - 1] - times[0];
        if total_time > 0.0 {
            integral / total_time
        } else {
            first
        }
    }

    /// Largest value of a profile, or `0.0` if every value is negative.
    #[inline]
    pub fn peak(profile: &[f64]) -> f64 {
        profile.iter().copied().fold(0.0_f64, f64::max)
    }

    fn column_mean<F>(matrix: &ExposureMatrix, f: F) -> Vec<f64>
    where
        F: Fn(f64) -> f64 + Sync,
    {
        let n_paths = matrix.n_paths() as f64;
        (0..matrix.n_times())
            .into_par_iter()
            .map(|t| matrix.column(t).map(&f).sum::<f64>() / n_paths)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn matrix(rows: Vec<Vec<f64>>) -> ExposureMatrix {
        ExposureMatrix::from_rows(rows.into_iter().enumerate().collect()).unwrap()
    }

    #[test]
    fn test_expected_positive_exposure() {
        let m = matrix(vec![
            vec![10.0, 20.0, 15.0],
            vec![5.0, -10.0, 25.0],
            vec![-5.0, 15.0, 10.0],
        ]);
        let epe = ExposureCalculator::expected_positive_exposure(&m);

        assert_relative_eq!(epe[0], 5.0, epsilon = 1e-10);
        assert_relative_eq!(epe[1], 35.0 / 3.0, epsilon = 1e-10);
        assert_relative_eq!(epe[2], 50.0 / 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_expected_negative_exposure_is_signed() {
        let m = matrix(vec![vec![10.0, -20.0], vec![-5.0, -10.0], vec![15.0, 5.0]]);
        let ene = ExposureCalculator::expected_negative_exposure(&m);

        assert_relative_eq!(ene[0], -5.0 / 3.0, epsilon = 1e-10);
        assert_relative_eq!(ene[1], -10.0, epsilon = 1e-10);
    }

    #[test]
    fn test_constant_paths() {
        // one path per constant rate scenario, all flat across time
        let m = matrix(vec![vec![3.0; 4], vec![-1.0; 4], vec![1.0; 4]]);
        let epe = ExposureCalculator::expected_positive_exposure(&m);
        let ene = ExposureCalculator::expected_negative_exposure(&m);
        let mean = ExposureCalculator::mean_exposure(&m);

        for t in 0..4 {
            assert_relative_eq!(epe[t], 4.0 / 3.0, epsilon = 1e-12);
            assert_relative_eq!(ene[t], -1.0 / 3.0, epsilon = 1e-12);
            assert_relative_eq!(mean[t], 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_potential_future_exposure() {
        let m = matrix(vec![vec![10.0], vec![5.0], vec![15.0], vec![20.0], vec![25.0]]);
        // sorted [5, 10, 15, 20, 25], index round(4 * 0.8) = 3
        let pfe = ExposureCalculator::potential_future_exposure(&m, 0.80);
        assert_relative_eq!(pfe[0], 20.0, epsilon = 1e-10);
    }

    #[test]
    fn test_time_weighted_average_degenerate() {
        assert_eq!(ExposureCalculator::time_weighted_average(&[], &[]), 0.0);
        assert_eq!(ExposureCalculator::time_weighted_average(&[7.0], &[0.0]), 7.0);
        assert_eq!(
            ExposureCalculator::time_weighted_average(&[7.0, 9.0], &[1.0, 1.0]),
            7.0
        );
    }

    #[test]
    fn test_peak() {
        assert_eq!(ExposureCalculator::peak(&[10.0, 25.0, 15.0, 30.0, 20.0]), 30.0);
        assert_eq!(ExposureCalculator::peak(&[-1.0, -2.0]), 0.0);
    }

    proptest! {
        #[test]
        fn prop_epe_plus_ene_is_mean(
            rows in prop::collection::vec(prop::collection::vec(-1e6f64..1e6, 5), 1..20)
        ) {
            let m = ExposureMatrix::from_rows(
                rows.into_iter().enumerate().collect::<BTreeMap<_, _>>()
            ).unwrap();
            let epe = ExposureCalculator::expected_positive_exposure(&m);
            let ene = ExposureCalculator::expected_negative_exposure(&m);
            let mean = ExposureCalculator::mean_exposure(&m);

            for t in 0..m.n_times() {
                prop_assert!(epe[t] >= 0.0);
                prop_assert!(ene[t] <= 0.0);
                prop_assert!((epe[t] + ene[t] - mean[t]).abs() <= 1e-6);
            }
        }
    }
}
