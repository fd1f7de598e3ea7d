//! Shared fixtures for unit tests.

use std::sync::Arc;

use pricer_core::market_data::curves::DiscountCurve;
use pricer_core::types::{Date, DayCountConvention};
use pricer_models::instruments::rates::{
    FixingTable, InterestRateSwap, RateIndex, SwapDirection, SwapTerms,
};

use crate::store::{MemoryStore, ResultStore};
use crate::task::{PathTask, PathWorker};

pub(crate) fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

/// Flat 3% ACT/360 curve from 2018-12-14 with annual pillars.
pub(crate) fn market() -> Arc<DiscountCurve<f64>> {
    let reference = date(2018, 12, 14);
    let dc = DayCountConvention::ActualActual360;
    let pillars: Vec<(Date, f64)> = (0..=3)
        .map(|k| {
            let d = reference.add_months(12 * k).unwrap();
            (d, (-0.03 * dc.year_fraction(reference, d)).exp())
        })
        .collect();
    Arc::new(DiscountCurve::from_dates(reference, &pillars, dc).unwrap())
}

/// One-year receiver on USD-LIBOR-3M at 3%.
pub(crate) fn swap() -> Arc<InterestRateSwap> {
    let terms = SwapTerms {
        start: date(2018, 12, 14),
        end: date(2019, 12, 14),
        notional: 10_000_000.0,
        direction: SwapDirection::ReceiveFixed,
        fixed_tenor: "1Y".parse().unwrap(),
        fixed_day_count: DayCountConvention::ActualActual365,
        floating_spread: 0.0,
        index: RateIndex::UsdLibor3M,
        floating_day_count: DayCountConvention::ActualActual360,
    };
    Arc::new(terms.build(0.03).unwrap())
}

/// Constant-rate path on the ten-week grid from 2018-12-14.
pub(crate) fn task(path: usize, rate: f64) -> PathTask {
    PathTask {
        simulation_num: path,
        first_index_fixing: 0.0277594,
        a: 0.1421842834,
        sigma: 0.0081355969,
        settlement_date: date(2018, 12, 14),
        end_date: date(2019, 2, 22),
        grid_step_period: "1W".parse().unwrap(),
        one_path: vec![rate; 11],
    }
}

pub(crate) fn fixings() -> FixingTable {
    [(date(2018, 12, 12), 0.0277594)].into_iter().collect()
}

/// Worker over a memory store that already holds [`fixings`].
pub(crate) fn worker() -> (Arc<PathWorker>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    store.put_fixings(&fixings()).unwrap();
    let worker = Arc::new(PathWorker::new(market(), swap(), store.clone()));
    (worker, store)
}
