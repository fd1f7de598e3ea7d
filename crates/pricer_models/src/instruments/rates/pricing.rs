//! Interest rate swap valuation.
//!
//! A swap is valued at a [`PricingContext`]: a valuation date, a discount
//! curve, a forecast curve and a table of past index fixings. Both curves
//! are dated, so the same routine serves today's market curve and a curve
//! rebuilt at a future simulation date.
//!
//! # IRS Pricing
//!
//! Only cash flows paid strictly after the valuation date count, each
//! discounted by `P(pay) / P(valuation)`:
//!
//! - Fixed leg: `Σ N × K × τ_i × df_i`
//! - Floating leg: `Σ N × (L_i + s) × τ_i × df_i`, where `L_i` is the
//!   historical fixing if the period reset before the valuation date and
//!   the simply-compounded forward `(P(start) / P(end) - 1) / τ_i` otherwise
//!
//! # Example
//!
//! ```
//! use pricer_models::instruments::rates::pricing::{par_fixed_rate, price_irs, PricingContext};
//! use pricer_models::instruments::rates::{FixingTable, RateIndex, SwapDirection, SwapTerms};
//! use pricer_core::market_data::curves::DiscountCurve;
//! use pricer_core::types::{Date, DayCountConvention};
//!
//! let start = Date::from_ymd(2020, 1, 15).unwrap();
//! let end = Date::from_ymd(2022, 1, 15).unwrap();
//! let curve = DiscountCurve::from_pillars(
//!     &[(start, 1.0), (end, 0.95)],
//!     DayCountConvention::ActualActual365,
//! )
//! .unwrap();
//!
//! let terms = SwapTerms {
//!     start,
//!     end,
//!     notional: 1_000_000.0,
//!     direction: SwapDirection::PayFixed,
//!     fixed_tenor: "6M".parse().unwrap(),
//!     fixed_day_count: DayCountConvention::Thirty360,
//!     floating_spread: 0.0,
//!     index: RateIndex::UsdLibor3M,
//!     floating_day_count: DayCountConvention::ActualActual360,
//! };
//! let fixings: FixingTable = [(Date::from_ymd(2020, 1, 13).unwrap(), 0.025)]
//!     .into_iter()
//!     .collect();
//! let ctx = PricingContext::new(start, &curve, &fixings);
//!
//! let unpriced = terms.build(0.0).unwrap();
//! let par = par_fixed_rate(&unpriced, &ctx).unwrap();
//! let swap = unpriced.with_fixed_rate(par).unwrap();
//!
//! assert!(price_irs(&swap, &ctx).unwrap().abs() < 1e-6);
//! ```

use pricer_core::market_data::curves::DiscountCurve;
use pricer_core::types::{Date, DayCountConvention};

use super::fixings::FixingTable;
use super::swap::InterestRateSwap;
use crate::instruments::InstrumentError;

/// Market state a swap is valued against.
#[derive(Debug, Clone, Copy)]
pub struct PricingContext<'a> {
    /// Valuation date; payments on or before it are dropped.
    pub valuation_date: Date,
    /// Curve used to discount cash flows.
    pub discount: &'a DiscountCurve<f64>,
    /// Curve used to project floating rates.
    pub forecast: &'a DiscountCurve<f64>,
    /// Past index fixings.
    pub fixings: &'a FixingTable,
}

impl<'a> PricingContext<'a> {
    /// Single-curve context: discount and forecast on the same curve.
    pub fn new(
        valuation_date: Date,
        curve: &'a DiscountCurve<f64>,
        fixings: &'a FixingTable,
    ) -> Self {
        Self {
            valuation_date,
            discount: curve,
            forecast: curve,
            fixings,
        }
    }

    /// Dual-curve context.
    pub fn with_forecast(mut self, forecast: &'a DiscountCurve<f64>) -> Self {
        self.forecast = forecast;
        self
    }

    /// Discount factor from `date` back to the valuation date.
    fn discount(&self, date: Date) -> Result<f64, InstrumentError> {
        let df = self.discount.discount_date(date)? / self.discount.discount_date(self.valuation_date)?;
        Ok(df)
    }
}

/// Simply-compounded forward rate over `[start, end]`.
///
/// # Errors
///
/// Propagates curve lookup failures.
pub fn forward_rate(
    curve: &DiscountCurve<f64>,
    start: Date,
    end: Date,
    day_count: DayCountConvention,
) -> Result<f64, InstrumentError> {
    let tau = day_count.year_fraction(start, end);
    if tau <= 0.0 {
        return Err(InstrumentError::InvalidParameter(format!(
            "accrual period {} to {} has no length",
            start, end
        )));
    }
    let p_start = curve.discount_date(start)?;
    let p_end = curve.discount_date(end)?;
    Ok((p_start / p_end - 1.0) / tau)
}

/// PV of the fixed leg at a unit fixed rate: `Σ N × τ_i × df_i`.
pub fn fixed_leg_annuity(
    swap: &InterestRateSwap,
    ctx: &PricingContext<'_>,
) -> Result<f64, InstrumentError> {
    let leg = swap.fixed_leg();
    let mut annuity = 0.0;
    for period in leg.schedule().iter() {
        if period.payment() <= ctx.valuation_date {
            continue;
        }
        let tau = leg.day_count().year_fraction(period.start(), period.end());
        annuity += swap.notional() * tau * ctx.discount(period.payment())?;
    }
    Ok(annuity)
}

/// Unsigned PV of the fixed leg.
pub fn price_fixed_leg(
    swap: &InterestRateSwap,
    ctx: &PricingContext<'_>,
) -> Result<f64, InstrumentError> {
    Ok(swap.fixed_rate() * fixed_leg_annuity(swap, ctx)?)
}

/// Unsigned PV of the floating leg.
///
/// # Errors
///
/// `Fixing` if a past reset cannot be resolved, or any curve failure.
pub fn price_floating_leg(
    swap: &InterestRateSwap,
    ctx: &PricingContext<'_>,
) -> Result<f64, InstrumentError> {
    let leg = swap.floating_leg();
    let index = leg.index();
    let mut pv = 0.0;

    for period in leg.schedule().iter() {
        if period.payment() <= ctx.valuation_date {
            continue;
        }
        let reset = index.fixing_date(period.start())?;
        let rate = if reset < ctx.valuation_date {
            ctx.fixings.resolve(reset)?
        } else {
            forward_rate(ctx.forecast, period.start(), period.end(), leg.day_count())?
        };
        let tau = leg.day_count().year_fraction(period.start(), period.end());
        pv += swap.notional() * (rate + leg.spread()) * tau * ctx.discount(period.payment())?;
    }
    Ok(pv)
}

/// Signed swap PV from the holder's side.
///
/// Receiver: `fixed - floating`; payer: `floating - fixed`.
///
/// # Errors
///
/// `NonFinite` if the result is NaN or infinite, or any leg failure.
pub fn price_irs(swap: &InterestRateSwap, ctx: &PricingContext<'_>) -> Result<f64, InstrumentError> {
    let direction = swap.direction();
    let npv = direction.fixed_multiplier() * price_fixed_leg(swap, ctx)?
        + direction.floating_multiplier() * price_floating_leg(swap, ctx)?;
    if !npv.is_finite() {
        return Err(InstrumentError::NonFinite { quantity: "swap NPV" });
    }
    Ok(npv)
}

/// Fixed rate at which the swap has zero PV in `ctx`.
///
/// Solved against the same leg routines used by [`price_irs`], so the
/// swap repriced at this rate values to zero up to rounding.
///
/// # Errors
///
/// `ZeroAnnuity` if no fixed payments remain after the valuation date.
pub fn par_fixed_rate(
    swap: &InterestRateSwap,
    ctx: &PricingContext<'_>,
) -> Result<f64, InstrumentError> {
    let annuity = fixed_leg_annuity(swap, ctx)?;
    if annuity.abs() < f64::EPSILON {
        return Err(InstrumentError::ZeroAnnuity {
            valuation_date: ctx.valuation_date,
        });
    }
    Ok(price_floating_leg(swap, ctx)? / annuity)
}
