//! Run-scoped market data cache.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use pricer_core::market_data::curves::DiscountCurve;
use pricer_core::types::DayCountConvention;
use tracing::info;

use crate::error::{ExposureError, StoreError};
use crate::io::load_discount_curve;

enum CurveSource {
    Loaded,
    Csv {
        path: PathBuf,
        day_count: DayCountConvention,
    },
}

/// Holds the t=0 market curve for the lifetime of one exposure run.
///
/// The curve is loaded on first access and then shared read-only, by
/// [`Arc`], with every unit of work. Dropping the cache ends its lifetime;
/// nothing is held in process-wide state.
///
/// # Examples
///
/// ```
/// use pricer_xva::MarketCache;
/// use pricer_core::market_data::curves::DiscountCurve;
/// use pricer_core::types::{Date, DayCountConvention};
///
/// let curve = DiscountCurve::from_pillars(
///     &[
///         (Date::from_ymd(2018, 12, 12).unwrap(), 1.0),
///         (Date::from_ymd(2023, 12, 12).unwrap(), 0.85),
///     ],
///     DayCountConvention::ActualActual360,
/// )
/// .unwrap();
///
/// let cache = MarketCache::from_curve(curve);
/// let a = cache.market_curve().unwrap();
/// let b = cache.market_curve().unwrap();
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
/// ```
pub struct MarketCache {
    source: CurveSource,
    curve: Mutex<Option<Arc<DiscountCurve<f64>>>>,
}

impl MarketCache {
    /// Cache around an already-built curve.
    pub fn from_curve(curve: DiscountCurve<f64>) -> Self {
        Self {
            source: CurveSource::Loaded,
            curve: Mutex::new(Some(Arc::new(curve))),
        }
    }

    /// Cache that loads a `date,discount_factor` CSV on first access.
    pub fn from_csv(path: impl Into<PathBuf>, day_count: DayCountConvention) -> Self {
        Self {
            source: CurveSource::Csv {
                path: path.into(),
                day_count,
            },
            curve: Mutex::new(None),
        }
    }

    /// The market curve, loading it if this is the first access.
    ///
    /// # Errors
    ///
    /// `Input` if the CSV cannot be read or does not form a valid curve.
    pub fn market_curve(&self) -> Result<Arc<DiscountCurve<f64>>, ExposureError> {
        let mut slot = self.curve.lock().map_err(|_| StoreError::Poisoned)?;
        if let Some(curve) = slot.as_ref() {
            return Ok(Arc::clone(curve));
        }

        let curve = match &self.source {
            CurveSource::Csv { path, day_count } => {
                let curve = load_discount_curve(path, *day_count)?;
                info!(
                    path = %path.display(),
                    reference = %curve.reference_date(),
                    pillars = curve.pillar_times().len(),
                    "loaded market curve"
                );
                Arc::new(curve)
            }
            CurveSource::Loaded => {
                return Err(ExposureError::Input(crate::io::DataError::Invalid(
                    "market cache has no curve".to_string(),
                )))
            }
        };
        *slot = Some(Arc::clone(&curve));
        Ok(curve)
    }

    /// Whether the curve has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.curve.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }
}
