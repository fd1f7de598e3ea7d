//! Interest Rate Swap (IRS) implementation.
//!
//! This module provides the [`InterestRateSwap`] structure for a vanilla
//! fixed/float swap, the IBOR [`RateIndex`] driving its floating leg, and
//! [`SwapTerms`] for building one from a static description.
//!
//! # Example
//!
//! ```
//! use pricer_models::instruments::rates::{RateIndex, SwapDirection, SwapTerms};
//! use pricer_core::types::{Date, DayCountConvention};
//!
//! let terms = SwapTerms {
//!     start: Date::from_ymd(2018, 12, 14).unwrap(),
//!     end: Date::from_ymd(2023, 12, 14).unwrap(),
//!     notional: 10_000_000.0,
//!     direction: SwapDirection::ReceiveFixed,
//!     fixed_tenor: "1Y".parse().unwrap(),
//!     fixed_day_count: DayCountConvention::ActualActual365,
//!     floating_spread: 0.001277206920730623,
//!     index: RateIndex::UsdLibor3M,
//!     floating_day_count: DayCountConvention::ActualActual360,
//! };
//! let swap = terms.build(0.03).unwrap();
//!
//! assert_eq!(swap.fixed_leg().schedule().len(), 5);
//! assert_eq!(swap.floating_leg().schedule().len(), 20);
//! assert!(swap.is_receiver());
//! ```

use pricer_core::types::{Date, DateError, DayCountConvention, Tenor, TenorUnit};
use std::fmt;
use std::str::FromStr;

use crate::instruments::InstrumentError;
use crate::schedules::{DateGeneration, Schedule, ScheduleBuilder};

/// IBOR benchmark index for the floating leg.
///
/// Each index resets `fixing_days()` calendar days before the accrual start
/// of the period it fixes.
///
/// # Examples
///
/// ```
/// use pricer_models::instruments::rates::RateIndex;
/// use pricer_core::types::Date;
///
/// let index = RateIndex::UsdLibor3M;
/// assert_eq!(index.name(), "USD-LIBOR-3M");
/// assert_eq!(index.tenor_months(), 3);
///
/// let start = Date::from_ymd(2019, 3, 14).unwrap();
/// assert_eq!(index.fixing_date(start).unwrap(), Date::from_ymd(2019, 3, 12).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateIndex {
    /// USD LIBOR 3 month.
    UsdLibor3M,
    /// USD LIBOR 6 month.
    UsdLibor6M,
    /// Euro Interbank Offered Rate - 3 Month.
    Euribor3M,
    /// Euro Interbank Offered Rate - 6 Month.
    Euribor6M,
}

impl RateIndex {
    /// Returns the standard name for this index.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            RateIndex::UsdLibor3M => "USD-LIBOR-3M",
            RateIndex::UsdLibor6M => "USD-LIBOR-6M",
            RateIndex::Euribor3M => "EURIBOR-3M",
            RateIndex::Euribor6M => "EURIBOR-6M",
        }
    }

    /// Returns the tenor in months.
    #[inline]
    pub fn tenor_months(&self) -> u32 {
        match self {
            RateIndex::UsdLibor3M | RateIndex::Euribor3M => 3,
            RateIndex::UsdLibor6M | RateIndex::Euribor6M => 6,
        }
    }

    /// Index tenor as a [`Tenor`].
    pub fn tenor(&self) -> Result<Tenor, DateError> {
        Tenor::new(self.tenor_months(), TenorUnit::Months)
    }

    /// Calendar days between fixing and accrual start.
    #[inline]
    pub fn fixing_days(&self) -> u32 {
        2
    }

    /// Returns the default day count convention for this index.
    #[inline]
    pub fn default_day_count(&self) -> DayCountConvention {
        DayCountConvention::ActualActual360
    }

    /// Fixing date for a period accruing from `accrual_start`.
    pub fn fixing_date(&self, accrual_start: Date) -> Result<Date, DateError> {
        accrual_start.add_days(-i64::from(self.fixing_days()))
    }
}

impl fmt::Display for RateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for RateIndex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(['-', '_', ' '], "").as_str() {
            "USDLIBOR3M" | "LIBOR3M" | "USD3M" => Ok(RateIndex::UsdLibor3M),
            "USDLIBOR6M" | "LIBOR6M" | "USD6M" => Ok(RateIndex::UsdLibor6M),
            "EURIBOR3M" | "EUR3M" => Ok(RateIndex::Euribor3M),
            "EURIBOR6M" | "EUR6M" => Ok(RateIndex::Euribor6M),
            _ => Err(format!("Unknown rate index: {}", s)),
        }
    }
}

/// Swap direction (payer or receiver of fixed rate).
///
/// - **PayFixed** (Payer swap): Pay fixed rate, receive floating rate
/// - **ReceiveFixed** (Receiver swap): Receive fixed rate, pay floating rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapDirection {
    /// Pay fixed rate, receive floating rate.
    PayFixed,
    /// Receive fixed rate, pay floating rate.
    ReceiveFixed,
}

impl SwapDirection {
    /// Sign applied to the fixed leg PV.
    #[inline]
    pub fn fixed_multiplier(&self) -> f64 {
        match self {
            SwapDirection::PayFixed => -1.0,
            SwapDirection::ReceiveFixed => 1.0,
        }
    }

    /// Sign applied to the floating leg PV.
    #[inline]
    pub fn floating_multiplier(&self) -> f64 {
        -self.fixed_multiplier()
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapDirection::PayFixed => write!(f, "Pay Fixed"),
            SwapDirection::ReceiveFixed => write!(f, "Receive Fixed"),
        }
    }
}

impl FromStr for SwapDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "payer" | "payfixed" | "pay" => Ok(SwapDirection::PayFixed),
            "receiver" | "receivefixed" | "receive" => Ok(SwapDirection::ReceiveFixed),
            _ => Err(format!("Unknown swap direction: {}", s)),
        }
    }
}

/// Fixed leg of an interest rate swap.
///
/// ```text
/// CF_i = Notional × FixedRate × YearFraction_i
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FixedLeg {
    schedule: Schedule,
    fixed_rate: f64,
    day_count: DayCountConvention,
}

impl FixedLeg {
    /// Create a fixed leg.
    pub fn new(schedule: Schedule, fixed_rate: f64, day_count: DayCountConvention) -> Self {
        Self {
            schedule,
            fixed_rate,
            day_count,
        }
    }

    /// Payment schedule.
    #[inline]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Contractual fixed rate.
    #[inline]
    pub fn fixed_rate(&self) -> f64 {
        self.fixed_rate
    }

    /// Accrual day count.
    #[inline]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }
}

/// Floating leg of an interest rate swap.
///
/// ```text
/// CF_i = Notional × (IndexRate_i + Spread) × YearFraction_i
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingLeg {
    schedule: Schedule,
    spread: f64,
    index: RateIndex,
    day_count: DayCountConvention,
}

impl FloatingLeg {
    /// Create a floating leg.
    pub fn new(
        schedule: Schedule,
        spread: f64,
        index: RateIndex,
        day_count: DayCountConvention,
    ) -> Self {
        Self {
            schedule,
            spread,
            index,
            day_count,
        }
    }

    /// Payment schedule.
    #[inline]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Spread over the index.
    #[inline]
    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// Floating index.
    #[inline]
    pub fn index(&self) -> RateIndex {
        self.index
    }

    /// Accrual day count.
    #[inline]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Fixing date of every period, in schedule order.
    pub fn fixing_dates(&self) -> Result<Vec<Date>, DateError> {
        self.schedule
            .iter()
            .map(|p| self.index.fixing_date(p.start()))
            .collect()
    }
}

/// Plain vanilla interest rate swap. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct InterestRateSwap {
    notional: f64,
    fixed_leg: FixedLeg,
    floating_leg: FloatingLeg,
    direction: SwapDirection,
}

impl InterestRateSwap {
    /// Create a swap.
    ///
    /// # Errors
    ///
    /// `InvalidNotional` for non-positive or non-finite notional;
    /// `InvalidParameter` for a non-finite fixed rate or spread.
    pub fn new(
        notional: f64,
        fixed_leg: FixedLeg,
        floating_leg: FloatingLeg,
        direction: SwapDirection,
    ) -> Result<Self, InstrumentError> {
        if !(notional.is_finite() && notional > 0.0) {
            return Err(InstrumentError::InvalidNotional { notional });
        }
        if !fixed_leg.fixed_rate().is_finite() {
            return Err(InstrumentError::InvalidParameter(format!(
                "fixed rate {}",
                fixed_leg.fixed_rate()
            )));
        }
        if !floating_leg.spread().is_finite() {
            return Err(InstrumentError::InvalidParameter(format!(
                "floating spread {}",
                floating_leg.spread()
            )));
        }
        Ok(Self {
            notional,
            fixed_leg,
            floating_leg,
            direction,
        })
    }

    /// Same swap with a different contractual fixed rate.
    pub fn with_fixed_rate(&self, fixed_rate: f64) -> Result<Self, InstrumentError> {
        let fixed_leg = FixedLeg::new(
            self.fixed_leg.schedule.clone(),
            fixed_rate,
            self.fixed_leg.day_count,
        );
        Self::new(
            self.notional,
            fixed_leg,
            self.floating_leg.clone(),
            self.direction,
        )
    }

    /// Notional amount.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Fixed leg.
    #[inline]
    pub fn fixed_leg(&self) -> &FixedLeg {
        &self.fixed_leg
    }

    /// Floating leg.
    #[inline]
    pub fn floating_leg(&self) -> &FloatingLeg {
        &self.floating_leg
    }

    /// Swap direction.
    #[inline]
    pub fn direction(&self) -> SwapDirection {
        self.direction
    }

    /// Contractual fixed rate.
    #[inline]
    pub fn fixed_rate(&self) -> f64 {
        self.fixed_leg.fixed_rate
    }

    /// Last payment date across both legs.
    pub fn maturity_date(&self) -> Date {
        self.fixed_leg
            .schedule
            .end_date()
            .max(self.floating_leg.schedule.end_date())
    }

    /// Returns true if this is a payer swap.
    #[inline]
    pub fn is_payer(&self) -> bool {
        self.direction == SwapDirection::PayFixed
    }

    /// Returns true if this is a receiver swap.
    #[inline]
    pub fn is_receiver(&self) -> bool {
        self.direction == SwapDirection::ReceiveFixed
    }
}

/// Static description of a vanilla swap.
///
/// Both legs are generated backward from `end` with unadjusted dates; the
/// floating leg rolls at the index tenor.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapTerms {
    /// Effective date.
    pub start: Date,
    /// Termination date.
    pub end: Date,
    /// Notional amount.
    pub notional: f64,
    /// Payer or receiver of the fixed leg.
    pub direction: SwapDirection,
    /// Fixed leg roll tenor.
    pub fixed_tenor: Tenor,
    /// Fixed leg day count.
    pub fixed_day_count: DayCountConvention,
    /// Spread over the floating index.
    pub floating_spread: f64,
    /// Floating index.
    pub index: RateIndex,
    /// Floating leg day count.
    pub floating_day_count: DayCountConvention,
}

impl SwapTerms {
    /// Generate both schedules and build the swap at `fixed_rate`.
    pub fn build(&self, fixed_rate: f64) -> Result<InterestRateSwap, InstrumentError> {
        let fixed_schedule = ScheduleBuilder::new()
            .start(self.start)
            .end(self.end)
            .tenor(self.fixed_tenor)
            .generation(DateGeneration::Backward)
            .day_count(self.fixed_day_count)
            .build()?;
        let floating_schedule = ScheduleBuilder::new()
            .start(self.start)
            .end(self.end)
            .tenor(self.index.tenor()?)
            .generation(DateGeneration::Backward)
            .day_count(self.floating_day_count)
            .build()?;

        InterestRateSwap::new(
            self.notional,
            FixedLeg::new(fixed_schedule, fixed_rate, self.fixed_day_count),
            FloatingLeg::new(
                floating_schedule,
                self.floating_spread,
                self.index,
                self.floating_day_count,
            ),
            self.direction,
        )
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{RateIndex, SwapDirection};
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    impl Serialize for RateIndex {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> Deserialize<'de> for RateIndex {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            RateIndex::from_str(&s).map_err(de::Error::custom)
        }
    }

    impl Serialize for SwapDirection {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(match self {
                SwapDirection::PayFixed => "payer",
                SwapDirection::ReceiveFixed => "receiver",
            })
        }
    }

    impl<'de> Deserialize<'de> for SwapDirection {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            SwapDirection::from_str(&s).map_err(de::Error::custom)
        }
    }
}
