//! Hull-White one-factor interest rate model.
//!
//! The Hull-White model is a short-rate model described by:
//! ```text
//! dr(t) = [theta(t) - a * r(t)] * dt + sigma * dW(t)
//! ```
//! where:
//! - r(t) = short rate at time t
//! - a = mean reversion speed (must be positive)
//! - sigma = volatility (must be positive)
//! - theta(t) = time-dependent drift fitted to the initial curve
//!
//! ## Decomposition
//!
//! The short rate splits into a zero-mean Ornstein-Uhlenbeck factor and a
//! deterministic shift:
//! ```text
//! r(t) = x(t) + alpha(t),   dx = -a x dt + sigma dW,   x(0) = 0
//! alpha(t) = f(0, t) + sigma^2 / (2 a^2) * (1 - exp(-a t))^2
//! ```
//! so `x` can be sampled exactly over any step length.
//!
//! ## Zero-coupon bonds
//!
//! ```text
//! B(t, T) = (1 - exp(-a (T - t))) / a
//! A(t, T) = P0(T) / P0(t) * exp(B f(0, t) - sigma^2 / (4 a) * B^2 * (1 - exp(-2 a t)))
//! P(t, T) = A(t, T) * exp(-B(t, T) * r(t))
//! ```
//!
//! ## Usage
//!
//! ```
//! use pricer_models::models::rates::hull_white::{HullWhiteModel, HullWhiteParams};
//! use pricer_core::market_data::curves::{FlatCurve, YieldCurve};
//!
//! let curve = FlatCurve::new(0.03_f64);
//! let params = HullWhiteParams::new(0.1, 0.01).unwrap();
//! let model = HullWhiteModel::new(params, &curve);
//!
//! // A bond observed at its own maturity is worth exactly one
//! assert_eq!(model.zero_bond(2.0, 2.0, 0.07).unwrap(), 1.0);
//!
//! // At t = 0 with r(0) = f(0, 0) the model reprices the initial curve
//! let r0 = model.initial_short_rate().unwrap();
//! let p = model.zero_bond(0.0, 5.0, r0).unwrap();
//! assert!((p - curve.discount_factor(5.0).unwrap()).abs() < 1e-14);
//! ```

use pricer_core::market_data::curves::YieldCurve;

use crate::models::ModelError;

/// Hull-White model parameters.
///
/// # Fields
///
/// * `mean_reversion` - Mean reversion speed (a), must be positive
/// * `volatility` - Short rate volatility (sigma), must be positive
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HullWhiteParams {
    mean_reversion: f64,
    volatility: f64,
}

impl HullWhiteParams {
    /// Create new Hull-White parameters with validation.
    ///
    /// # Example
    ///
    /// ```
    /// use pricer_models::models::rates::hull_white::HullWhiteParams;
    ///
    /// assert!(HullWhiteParams::new(0.1421842834, 0.0081355969).is_ok());
    /// assert!(HullWhiteParams::new(0.0, 0.01).is_err());
    /// assert!(HullWhiteParams::new(0.1, -0.01).is_err());
    /// ```
    pub fn new(mean_reversion: f64, volatility: f64) -> Result<Self, ModelError> {
        if !(mean_reversion.is_finite() && mean_reversion > 0.0) {
            return Err(ModelError::InvalidParameter {
                name: "mean_reversion",
                value: mean_reversion,
            });
        }
        if !(volatility.is_finite() && volatility > 0.0) {
            return Err(ModelError::InvalidParameter {
                name: "volatility",
                value: volatility,
            });
        }
        Ok(Self {
            mean_reversion,
            volatility,
        })
    }

    /// Mean reversion speed `a`.
    #[inline]
    pub fn mean_reversion(&self) -> f64 {
        self.mean_reversion
    }

    /// Short rate volatility `sigma`.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }
}

/// Hull-White one-factor model bound to an initial discount curve.
///
/// Holds only a shared reference to the t=0 curve; every evaluation is a
/// pure function of its arguments.
#[derive(Debug)]
pub struct HullWhiteModel<'a, C: YieldCurve<f64> + ?Sized> {
    params: HullWhiteParams,
    curve: &'a C,
}

impl<C: YieldCurve<f64> + ?Sized> Clone for HullWhiteModel<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: YieldCurve<f64> + ?Sized> Copy for HullWhiteModel<'_, C> {}

impl<'a, C: YieldCurve<f64> + ?Sized> HullWhiteModel<'a, C> {
    /// Bind parameters to the initial curve.
    pub fn new(params: HullWhiteParams, curve: &'a C) -> Self {
        Self { params, curve }
    }

    /// Model parameters.
    #[inline]
    pub fn params(&self) -> HullWhiteParams {
        self.params
    }

    /// Initial discount curve.
    #[inline]
    pub fn curve(&self) -> &'a C {
        self.curve
    }

    /// Model name used in logs.
    pub fn model_name() -> &'static str {
        "HullWhite1F"
    }

    /// `B(t, T) = (1 - exp(-a (T - t))) / a`.
    #[inline]
    pub fn b_factor(&self, t: f64, maturity: f64) -> f64 {
        let a = self.params.mean_reversion;
        (1.0 - (-a * (maturity - t)).exp()) / a
    }

    /// `A(t, T)` of the affine bond formula.
    pub fn a_factor(&self, t: f64, maturity: f64) -> Result<f64, ModelError> {
        let a = self.params.mean_reversion;
        let sigma = self.params.volatility;
        let b = self.b_factor(t, maturity);
        let forward = self.curve.instantaneous_forward(t)?;
        let variance = sigma * sigma / (4.0 * a) * b * b * (1.0 - (-2.0 * a * t).exp());
        let ratio = self.curve.discount_factor(maturity)? / self.curve.discount_factor(t)?;
        Ok((b * forward - variance).exp() * ratio)
    }

    /// Time-`t` price of a zero-coupon bond maturing at `maturity`, given
    /// the simulated short rate `r_t`.
    ///
    /// # Errors
    ///
    /// * `InvalidInterval` - `maturity < t` or `t < 0`
    /// * `NonFinite` - non-finite `r_t` or result
    /// * `MarketData` - initial curve query failed
    pub fn zero_bond(&self, t: f64, maturity: f64, r_t: f64) -> Result<f64, ModelError> {
        if !(t >= 0.0 && maturity >= t) {
            return Err(ModelError::InvalidInterval { t, maturity });
        }
        if !r_t.is_finite() {
            return Err(ModelError::NonFinite {
                quantity: "short rate",
                t,
            });
        }
        if maturity == t {
            return Ok(1.0);
        }
        let price = self.a_factor(t, maturity)? * (-self.b_factor(t, maturity) * r_t).exp();
        if !price.is_finite() {
            return Err(ModelError::NonFinite {
                quantity: "bond price",
                t,
            });
        }
        Ok(price)
    }

    /// Deterministic shift `alpha(t)` with `r(t) = x(t) + alpha(t)`.
    pub fn alpha(&self, t: f64) -> Result<f64, ModelError> {
        let a = self.params.mean_reversion;
        let sigma = self.params.volatility;
        let decay = 1.0 - (-a * t).exp();
        Ok(self.curve.instantaneous_forward(t)? + sigma * sigma / (2.0 * a * a) * decay * decay)
    }

    /// `r(0) = f(0, 0)`.
    pub fn initial_short_rate(&self) -> Result<f64, ModelError> {
        self.alpha(0.0)
    }

    /// Standard deviation of `x(t + dt)` given `x(t)`.
    #[inline]
    pub fn transition_std(&self, dt: f64) -> f64 {
        let a = self.params.mean_reversion;
        let sigma = self.params.volatility;
        sigma * ((1.0 - (-2.0 * a * dt).exp()) / (2.0 * a)).sqrt()
    }

    /// Exact Ornstein-Uhlenbeck transition of the factor over `dt` for a
    /// standard normal draw `z`.
    #[inline]
    pub fn evolve_factor(&self, x: f64, dt: f64, z: f64) -> f64 {
        x * (-self.params.mean_reversion * dt).exp() + self.transition_std(dt) * z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::market_data::curves::FlatCurve;
    use proptest::prelude::*;

    fn flat_model(curve: &FlatCurve<f64>) -> HullWhiteModel<'_, FlatCurve<f64>> {
        HullWhiteModel::new(HullWhiteParams::new(0.1421842834, 0.0081355969).unwrap(), curve)
    }

    #[test]
    fn test_params_reject_non_finite() {
        assert!(matches!(
            HullWhiteParams::new(f64::NAN, 0.01),
            Err(ModelError::InvalidParameter {
                name: "mean_reversion",
                ..
            })
        ));
        assert!(matches!(
            HullWhiteParams::new(0.1, f64::INFINITY),
            Err(ModelError::InvalidParameter {
                name: "volatility",
                ..
            })
        ));
    }

    #[test]
    fn test_b_factor_limits() {
        let curve = FlatCurve::new(0.03);
        let model = flat_model(&curve);
        assert_eq!(model.b_factor(1.0, 1.0), 0.0);
        // B -> T - t for small a (T - t)
        assert_relative_eq!(model.b_factor(1.0, 1.001), 0.001, epsilon = 1e-6);
        // B -> 1 / a for long maturities
        assert_relative_eq!(model.b_factor(0.0, 500.0), 1.0 / 0.1421842834, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_bond_decreasing_in_rate() {
        let curve = FlatCurve::new(0.03);
        let model = flat_model(&curve);
        let low = model.zero_bond(1.0, 3.0, 0.01).unwrap();
        let high = model.zero_bond(1.0, 3.0, 0.05).unwrap();
        assert!(low > high);
    }

    #[test]
    fn test_zero_bond_small_vol_matches_forward_curve() {
        let curve = FlatCurve::new(0.03);
        let model = HullWhiteModel::new(HullWhiteParams::new(0.2, 1e-8).unwrap(), &curve);
        let p = model.zero_bond(2.0, 5.0, 0.03).unwrap();
        assert_relative_eq!(p, (-0.03_f64 * 3.0).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_bond_invalid_interval() {
        let curve = FlatCurve::new(0.03);
        let model = flat_model(&curve);
        assert!(matches!(
            model.zero_bond(2.0, 1.0, 0.03),
            Err(ModelError::InvalidInterval { .. })
        ));
        assert!(matches!(
            model.zero_bond(-1.0, 1.0, 0.03),
            Err(ModelError::InvalidInterval { .. })
        ));
        assert!(matches!(
            model.zero_bond(1.0, 2.0, f64::NAN),
            Err(ModelError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_alpha_starts_at_initial_forward() {
        let curve = FlatCurve::new(0.025);
        let model = flat_model(&curve);
        assert_eq!(model.initial_short_rate().unwrap(), 0.025);
        assert!(model.alpha(5.0).unwrap() > 0.025);
    }

    #[test]
    fn test_evolve_factor() {
        let curve = FlatCurve::new(0.03);
        let model = flat_model(&curve);
        let dt = 7.0 / 365.0;

        assert_eq!(model.evolve_factor(0.0, dt, 0.0), 0.0);

        let decayed = model.evolve_factor(0.01, dt, 0.0);
        assert!(decayed < 0.01 && decayed > 0.0);

        // Small dt: std ~ sigma sqrt(dt)
        assert_relative_eq!(
            model.transition_std(1e-6),
            0.0081355969 * 1e-3,
            max_relative = 1e-6
        );
    }

    proptest! {
        #[test]
        fn prop_bond_at_own_maturity_is_one(
            t in 0.0f64..30.0,
            r in -0.2f64..0.3,
            a in 0.001f64..2.0,
            sigma in 0.0001f64..0.05,
        ) {
            let curve = FlatCurve::new(0.03);
            let model = HullWhiteModel::new(HullWhiteParams::new(a, sigma).unwrap(), &curve);
            prop_assert_eq!(model.zero_bond(t, t, r).unwrap(), 1.0);
            prop_assert!((model.a_factor(t, t).unwrap() - 1.0).abs() < 1e-14);
        }

        #[test]
        fn prop_bond_price_positive(
            t in 0.0f64..10.0,
            tau in 0.0f64..30.0,
            r in -0.1f64..0.2,
        ) {
            let curve = FlatCurve::new(0.03);
            let model = flat_model(&curve);
            let p = model.zero_bond(t, t + tau, r).unwrap();
            prop_assert!(p > 0.0 && p.is_finite());
        }
    }
}
