//! Dated discount curve with log-linear interpolation.

use super::YieldCurve;
use crate::market_data::error::MarketDataError;
use crate::types::{Date, DayCountConvention};
use num_traits::Float;

/// Discount curve built from dated discount-factor pillars.
///
/// Times are year fractions from the reference date under the curve's day
/// count. `ln D(t)` is interpolated linearly between pillars, i.e. the
/// forward rate is piecewise constant. Beyond the last pillar the final
/// segment's forward rate is held flat.
///
/// The curve is always normalised so that `D(0) = 1`: a pillar on the
/// reference date is rescaled to one (and every other pillar with it), and
/// a missing reference pillar is inserted with discount factor one.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{DiscountCurve, YieldCurve};
/// use pricer_core::types::{Date, DayCountConvention};
///
/// let reference = Date::from_ymd(2018, 12, 14).unwrap();
/// let pillars = [
///     (reference, 0.9999),
///     (Date::from_ymd(2019, 12, 14).unwrap(), 0.97),
///     (Date::from_ymd(2020, 12, 14).unwrap(), 0.94),
/// ];
/// let curve: DiscountCurve<f64> = DiscountCurve::from_dates(
///     reference,
///     &pillars,
///     DayCountConvention::ActualActual365,
/// )
/// .unwrap();
///
/// assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
/// let df = curve.discount_date(Date::from_ymd(2019, 12, 14).unwrap()).unwrap();
/// assert!((df - 0.97 / 0.9999).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountCurve<T: Float> {
    reference: Date,
    day_count: DayCountConvention,
    times: Vec<T>,
    log_dfs: Vec<T>,
}

impl<T: Float> DiscountCurve<T> {
    /// Construct a curve from `(date, discount factor)` pillars.
    ///
    /// Pillars may arrive in any order.
    ///
    /// # Errors
    ///
    /// * `InsufficientData` - no pillars, or only the reference pillar
    /// * `DuplicatePillar` - two pillars share a date
    /// * `PillarBeforeReference` - a pillar precedes `reference`
    /// * `NonPositiveDiscountFactor` / `NonFinite` - invalid discount factor
    pub fn from_dates(
        reference: Date,
        pillars: &[(Date, T)],
        day_count: DayCountConvention,
    ) -> Result<Self, MarketDataError> {
        if pillars.is_empty() {
            return Err(MarketDataError::InsufficientData { got: 0, need: 2 });
        }

        let mut sorted = pillars.to_vec();
        sorted.sort_by_key(|(date, _)| *date);

        let mut times = Vec::with_capacity(sorted.len() + 1);
        let mut log_dfs = Vec::with_capacity(sorted.len() + 1);

        for (i, &(date, df)) in sorted.iter().enumerate() {
            if i > 0 && sorted[i - 1].0 == date {
                return Err(MarketDataError::DuplicatePillar { date });
            }
            if date < reference {
                return Err(MarketDataError::PillarBeforeReference { date, reference });
            }
            let yf = day_count.year_fraction(reference, date);
            let df_f64 = df.to_f64().unwrap_or(f64::NAN);
            if !df_f64.is_finite() {
                return Err(MarketDataError::NonFinite {
                    t: yf,
                    value: df_f64,
                });
            }
            if df <= T::zero() {
                return Err(MarketDataError::NonPositiveDiscountFactor { t: yf, df: df_f64 });
            }
            times.push(T::from(yf).ok_or(MarketDataError::NonFinite { t: yf, value: yf })?);
            log_dfs.push(df.ln());
        }

        if times[0] > T::zero() {
            times.insert(0, T::zero());
            log_dfs.insert(0, T::zero());
        } else {
            let anchor = log_dfs[0];
            for value in log_dfs.iter_mut() {
                *value = *value - anchor;
            }
        }

        if times.len() < 2 {
            return Err(MarketDataError::InsufficientData {
                got: times.len(),
                need: 2,
            });
        }

        Ok(Self {
            reference,
            day_count,
            times,
            log_dfs,
        })
    }

    /// Construct a curve whose reference date is its earliest pillar.
    pub fn from_pillars(
        pillars: &[(Date, T)],
        day_count: DayCountConvention,
    ) -> Result<Self, MarketDataError> {
        let reference = pillars
            .iter()
            .map(|(date, _)| *date)
            .min()
            .ok_or(MarketDataError::InsufficientData { got: 0, need: 2 })?;
        Self::from_dates(reference, pillars, day_count)
    }

    /// Reference date, where `D = 1`.
    #[inline]
    pub fn reference_date(&self) -> Date {
        self.reference
    }

    /// Day count used to convert dates to curve time.
    #[inline]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Pillar times including the reference pillar at zero.
    #[inline]
    pub fn pillar_times(&self) -> &[T] {
        &self.times
    }

    /// Curve time of `date`.
    pub fn time_of(&self, date: Date) -> Result<T, MarketDataError> {
        let yf = self.day_count.year_fraction(self.reference, date);
        T::from(yf).ok_or(MarketDataError::NonFinite { t: yf, value: yf })
    }

    /// Discount factor for a calendar date.
    ///
    /// # Errors
    ///
    /// `InvalidMaturity` if `date` precedes the reference date.
    pub fn discount_date(&self, date: Date) -> Result<T, MarketDataError> {
        self.discount_factor(self.time_of(date)?)
    }

    /// Index `i` of the segment `[times[i], times[i + 1]]` used for `t`.
    ///
    /// Times beyond the last pillar map to the final segment.
    fn segment(&self, t: T) -> usize {
        let upper = self.times.partition_point(|&x| x <= t);
        upper.clamp(1, self.times.len() - 1) - 1
    }

    fn segment_slope(&self, i: usize) -> T {
        (self.log_dfs[i + 1] - self.log_dfs[i]) / (self.times[i + 1] - self.times[i])
    }
}

impl<T: Float> YieldCurve<T> for DiscountCurve<T> {
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() || !t.is_finite() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(f64::NAN),
            });
        }
        let i = self.segment(t);
        let log_df = self.log_dfs[i] + self.segment_slope(i) * (t - self.times[i]);
        Ok(log_df.exp())
    }

    /// Piecewise-constant forward of the segment containing `t` (right-continuous).
    fn instantaneous_forward(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() || !t.is_finite() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(-self.segment_slope(self.segment(t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn sample_curve() -> DiscountCurve<f64> {
        let reference = date(2018, 12, 14);
        DiscountCurve::from_dates(
            reference,
            &[
                (date(2020, 12, 14), 0.94),
                (reference, 1.0),
                (date(2019, 12, 14), 0.97),
            ],
            DayCountConvention::ActualActual365,
        )
        .unwrap()
    }

    #[test]
    fn test_unsorted_pillars_are_sorted() {
        let curve = sample_curve();
        let times = curve.pillar_times();
        assert!(times.windows(2).all(|w| w[0] < w[1]));
        assert_relative_eq!(
            curve.discount_date(date(2020, 12, 14)).unwrap(),
            0.94,
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_log_linear_midpoint() {
        let curve = sample_curve();
        let t1 = curve.time_of(date(2019, 12, 14)).unwrap();
        let t2 = curve.time_of(date(2020, 12, 14)).unwrap();
        let mid = 0.5 * (t1 + t2);
        let expected = (0.97_f64 * 0.94).sqrt();
        assert_relative_eq!(curve.discount_factor(mid).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_forward_extrapolation() {
        let curve = sample_curve();
        let t2 = curve.time_of(date(2020, 12, 14)).unwrap();
        let last_forward = curve.instantaneous_forward(t2 - 0.01).unwrap();
        assert_relative_eq!(
            curve.instantaneous_forward(t2 + 5.0).unwrap(),
            last_forward,
            epsilon = 1e-14
        );
        let df = curve.discount_factor(t2 + 5.0).unwrap();
        assert_relative_eq!(df, 0.94 * (-last_forward * 5.0).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_normalises_reference_pillar() {
        let reference = date(2018, 12, 12);
        let curve = DiscountCurve::from_dates(
            reference,
            &[(reference, 0.9998), (date(2019, 12, 12), 0.9700)],
            DayCountConvention::ActualActual360,
        )
        .unwrap();
        assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
        assert_relative_eq!(
            curve.discount_date(date(2019, 12, 12)).unwrap(),
            0.97 / 0.9998,
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_inserts_missing_reference_pillar() {
        let reference = date(2018, 12, 14);
        let curve = DiscountCurve::from_dates(
            reference,
            &[(date(2019, 12, 14), 0.97)],
            DayCountConvention::ActualActual365,
        )
        .unwrap();
        assert_eq!(curve.pillar_times().len(), 2);
        assert_eq!(curve.discount_date(reference).unwrap(), 1.0);
    }

    #[test]
    fn test_from_pillars_uses_earliest_date() {
        let curve = DiscountCurve::from_pillars(
            &[(date(2019, 6, 14), 0.98), (date(2018, 12, 14), 1.0)],
            DayCountConvention::ActualActual360,
        )
        .unwrap();
        assert_eq!(curve.reference_date(), date(2018, 12, 14));
    }

    #[test]
    fn test_rejects_invalid_pillars() {
        let reference = date(2018, 12, 14);
        let dc = DayCountConvention::ActualActual365;

        assert!(matches!(
            DiscountCurve::<f64>::from_dates(reference, &[], dc),
            Err(MarketDataError::InsufficientData { got: 0, .. })
        ));
        assert!(matches!(
            DiscountCurve::from_dates(reference, &[(reference, 1.0)], dc),
            Err(MarketDataError::InsufficientData { got: 1, need: 2 })
        ));
        assert!(matches!(
            DiscountCurve::from_dates(
                reference,
                &[(date(2019, 1, 1), 0.99), (date(2019, 1, 1), 0.98)],
                dc
            ),
            Err(MarketDataError::DuplicatePillar { .. })
        ));
        assert!(matches!(
            DiscountCurve::from_dates(reference, &[(date(2018, 1, 1), 1.01)], dc),
            Err(MarketDataError::PillarBeforeReference { .. })
        ));
        assert!(matches!(
            DiscountCurve::from_dates(reference, &[(date(2019, 1, 1), 0.0)], dc),
            Err(MarketDataError::NonPositiveDiscountFactor { .. })
        ));
        assert!(matches!(
            DiscountCurve::from_dates(reference, &[(date(2019, 1, 1), f64::NAN)], dc),
            Err(MarketDataError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_discount_before_reference_fails() {
        let curve = sample_curve();
        assert!(matches!(
            curve.discount_date(date(2018, 12, 13)),
            Err(MarketDataError::InvalidMaturity { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_pillars_are_reproduced(
            rates in proptest::collection::vec(-0.01f64..0.08, 1..12)
        ) {
            let reference = date(2020, 1, 15);
            let pillars: Vec<(Date, f64)> = rates
                .iter()
                .enumerate()
                .map(|(k, r)| {
                    let d = reference.add_months(6 * (k as i64 + 1)).unwrap();
                    let t = DayCountConvention::ActualActual365.year_fraction(reference, d);
                    (d, (-r * t).exp())
                })
                .collect();
            let curve = DiscountCurve::from_dates(
                reference,
                &pillars,
                DayCountConvention::ActualActual365,
            )
            .unwrap();

            prop_assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
            for (d, df) in &pillars {
                let got = curve.discount_date(*d).unwrap();
                prop_assert!((got - df).abs() < 1e-12);
            }
        }
    }
}
