//! Interest rate instruments.
//!
//! - [`InterestRateSwap`]: Plain vanilla IRS with fixed and floating legs
//! - [`RateIndex`]: IBOR index driving the floating leg
//! - [`FixingTable`]: Historical or simulated index fixings
//! - [`pricing`]: Leg PVs, swap NPV and par fixed rate

mod fixings;
pub mod pricing;
mod swap;

pub use fixings::{FixingError, FixingTable};
pub use pricing::{
    fixed_leg_annuity, forward_rate, par_fixed_rate, price_fixed_leg, price_floating_leg,
    price_irs, PricingContext,
};
pub use swap::{FixedLeg, FloatingLeg, InterestRateSwap, RateIndex, SwapDirection, SwapTerms};
