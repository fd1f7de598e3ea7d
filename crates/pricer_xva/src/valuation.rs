//! Swap revaluation along a simulated path.

use pricer_core::market_data::curves::DiscountCurve;
use pricer_core::types::Date;
use pricer_models::instruments::rates::{
    price_irs, FixingTable, InterestRateSwap, PricingContext,
};
use pricer_models::instruments::InstrumentError;

/// Values one swap against moving curves with a fixed set of resets.
///
/// On construction every floating reset date of the swap is resolved
/// against the simulated fixing table (exact match, else nearest date,
/// earlier date on a tie). Valuation then only looks up those resolved
/// rates, so a swap whose resets cannot all be resolved is rejected before
/// any path is valued.
///
/// # Examples
///
/// ```
/// use pricer_xva::InstrumentValuer;
/// use pricer_models::instruments::rates::{FixingTable, RateIndex, SwapDirection, SwapTerms};
/// use pricer_core::types::{Date, DayCountConvention};
///
/// let terms = SwapTerms {
///     start: Date::from_ymd(2018, 12, 14).unwrap(),
///     end: Date::from_ymd(2019, 12, 14).unwrap(),
///     notional: 1_000_000.0,
///     direction: SwapDirection::ReceiveFixed,
///     fixed_tenor: "1Y".parse().unwrap(),
///     fixed_day_count: DayCountConvention::ActualActual365,
///     floating_spread: 0.0,
///     index: RateIndex::UsdLibor3M,
///     floating_day_count: DayCountConvention::ActualActual360,
/// };
/// let swap = terms.build(0.03).unwrap();
/// let fixings: FixingTable = [(Date::from_ymd(2018, 12, 12).unwrap(), 0.028)].into_iter().collect();
///
/// let valuer = InstrumentValuer::new(&swap, &fixings).unwrap();
/// // every quarterly reset resolves to the only fixing available
/// assert_eq!(valuer.resolved_fixings().len(), 4);
/// ```
pub struct InstrumentValuer<'a> {
    swap: &'a InterestRateSwap,
    resolved: FixingTable,
}

impl<'a> InstrumentValuer<'a> {
    /// Resolves every reset date of `swap` against `fixings`.
    ///
    /// # Errors
    ///
    /// `Fixing` if `fixings` is empty.
    pub fn new(swap: &'a InterestRateSwap, fixings: &FixingTable) -> Result<Self, InstrumentError> {
        let resolved = swap
            .floating_leg()
            .fixing_dates()?
            .into_iter()
            .map(|date| Ok((date, fixings.resolve(date)?)))
            .collect::<Result<FixingTable, InstrumentError>>()?;
        Ok(Self { swap, resolved })
    }

    /// The instrument being valued.
    pub fn swap(&self) -> &InterestRateSwap {
        self.swap
    }

    /// Reset date to rate, one entry per floating period.
    pub fn resolved_fixings(&self) -> &FixingTable {
        &self.resolved
    }

    /// NPV at `valuation_date` under the given curve pair.
    pub fn value(
        &self,
        valuation_date: Date,
        discount: &DiscountCurve<f64>,
        forecast: &DiscountCurve<f64>,
    ) -> Result<f64, InstrumentError> {
        let ctx = PricingContext::new(valuation_date, discount, &self.resolved).with_forecast(forecast);
        price_irs(self.swap, &ctx)
    }

    /// Exposure vector for one path: step `t` is valued at `dates[t]` on
    /// `curves[t]`, used for both discounting and projection.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the two sequences differ in length, or the
    /// first valuation failure in step order.
    pub fn value_path(
        &self,
        dates: &[Date],
        curves: &[DiscountCurve<f64>],
    ) -> Result<Vec<f64>, InstrumentError> {
        if dates.len() != curves.len() {
            return Err(InstrumentError::InvalidParameter(format!(
                "{} valuation dates for {} curves",
                dates.len(),
                curves.len()
            )));
        }
        dates
            .iter()
            .zip(curves)
            .map(|(&date, curve)| self.value(date, curve, curve))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::types::DayCountConvention;
    use pricer_models::instruments::rates::{par_fixed_rate, RateIndex, SwapDirection, SwapTerms};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn terms() -> SwapTerms {
        SwapTerms {
            start: date(2018, 12, 14),
            end: date(2020, 12, 14),
            notional: 10_000_000.0,
            direction: SwapDirection::ReceiveFixed,
            fixed_tenor: "1Y".parse().unwrap(),
            fixed_day_count: DayCountConvention::ActualActual365,
            floating_spread: 0.001277206920730623,
            index: RateIndex::UsdLibor3M,
            floating_day_count: DayCountConvention::ActualActual360,
        }
    }

    fn flat_curve(reference: Date, rate: f64) -> DiscountCurve<f64> {
        let dc = DayCountConvention::ActualActual360;
        let pillars: Vec<(Date, f64)> = (0..=4)
            .map(|k| {
                let d = reference.add_months(12 * k).unwrap();
                (d, (-rate * dc.year_fraction(reference, d)).exp())
            })
            .collect();
        DiscountCurve::from_dates(reference, &pillars, dc).unwrap()
    }

    fn fixings() -> FixingTable {
        [
            (date(2018, 12, 12), 0.0277594),
            (date(2019, 3, 10), 0.028),
            (date(2019, 3, 14), 0.029),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_resolution_uses_nearest_with_earlier_tie() {
        let swap = terms().build(0.03).unwrap();
        let valuer = InstrumentValuer::new(&swap, &fixings()).unwrap();

        let resolved = valuer.resolved_fixings();
        assert_eq!(resolved.len(), 8);
        assert_eq!(resolved.get(date(2018, 12, 12)), Some(0.0277594));
        // 2019-03-12 is two days from both 03-10 and 03-14
        assert_eq!(resolved.get(date(2019, 3, 12)), Some(0.028));
    }

    #[test]
    fn test_empty_fixings_rejected() {
        let swap = terms().build(0.03).unwrap();
        assert!(matches!(
            InstrumentValuer::new(&swap, &FixingTable::new()),
            Err(InstrumentError::Fixing(_))
        ));
    }

    #[test]
    fn test_inception_npv_near_zero_at_par() {
        let curve = flat_curve(date(2018, 12, 14), 0.03);
        let fixings = fixings();
        let start = date(2018, 12, 14);

        let unpriced = terms().build(0.0).unwrap();
        let ctx = PricingContext::new(start, &curve, &fixings);
        let par = par_fixed_rate(&unpriced, &ctx).unwrap();
        let swap = unpriced.with_fixed_rate(par).unwrap();

        let valuer = InstrumentValuer::new(&swap, &fixings).unwrap();
        assert!(valuer.value(start, &curve, &curve).unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_value_path_steps_in_order() {
        let swap = terms().build(0.03).unwrap();
        let valuer = InstrumentValuer::new(&swap, &fixings()).unwrap();
        let dates = [date(2018, 12, 14), date(2019, 6, 14), date(2020, 12, 14)];
        let curves: Vec<DiscountCurve<f64>> = dates.iter().map(|&d| flat_curve(d, 0.03)).collect();

        let values = valuer.value_path(&dates, &curves).unwrap();
        assert_eq!(values.len(), 3);
        assert!(values.iter().all(|v| v.is_finite()));
        // nothing left to pay at maturity
        assert_relative_eq!(values[2], 0.0);
    }

    #[test]
    fn test_value_path_length_mismatch() {
        let swap = terms().build(0.03).unwrap();
        let valuer = InstrumentValuer::new(&swap, &fixings()).unwrap();
        let curves = vec![flat_curve(date(2018, 12, 14), 0.03)];
        assert!(valuer.value_path(&[], &curves).is_err());
    }
}
