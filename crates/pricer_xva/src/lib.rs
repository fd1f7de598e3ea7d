//! # Pricer XVA (L4: Application)
//!
//! Counterparty exposure of a vanilla swap under simulated Hull-White
//! short rates.
//!
//! This crate provides:
//! - Per-path discount curve snapshots from closed-form bond prices
//! - Swap revaluation along each path against simulated fixings
//! - Self-contained work units, dispatchers and a shared result store
//! - Deadline-bounded gathering and EPE/ENE reduction
//! - CSV readers and writers for curves, fixings and reports
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            pricer_xva (L4)              │
//! ├─────────────────────────────────────────┤
//! │  market/       - run-scoped curve cache │
//! │  path_curves/  - per-step snapshots     │
//! │  valuation/    - swap along a path      │
//! │  task/         - payloads and workers   │
//! │  dispatch/     - inline and rayon pools │
//! │  store/        - memory and directory   │
//! │  gather/       - deadline polling       │
//! │  exposure/     - EPE, ENE, PFE          │
//! │  orchestrator/ - one full run           │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │           pricer_kernel (L3)            │
//! │  Hull-White path simulation             │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use pricer_core::market_data::curves::DiscountCurve;
//! use pricer_core::types::{Date, DayCountConvention};
//! use pricer_kernel::mc::ShortRatePaths;
//! use pricer_models::instruments::rates::{FixingTable, RateIndex, SwapDirection, SwapTerms};
//! use pricer_models::models::rates::HullWhiteParams;
//! use pricer_models::schedules::SimulationGrid;
//! use pricer_xva::{ExposureOrchestrator, InlineDispatcher, MemoryStore, OrchestratorConfig, RunInputs};
//!
//! let start = Date::from_ymd(2018, 12, 14).unwrap();
//! let market = DiscountCurve::from_pillars(
//!     &[(start, 1.0), (Date::from_ymd(2020, 12, 14).unwrap(), 0.94)],
//!     DayCountConvention::ActualActual360,
//! )
//! .unwrap();
//!
//! let swap = SwapTerms {
//!     start,
//!     end: Date::from_ymd(2019, 12, 14).unwrap(),
//!     notional: 1_000_000.0,
//!     direction: SwapDirection::ReceiveFixed,
//!     fixed_tenor: "1Y".parse().unwrap(),
//!     fixed_day_count: DayCountConvention::ActualActual365,
//!     floating_spread: 0.0,
//!     index: RateIndex::UsdLibor3M,
//!     floating_day_count: DayCountConvention::ActualActual360,
//! }
//! .build(0.03)
//! .unwrap();
//!
//! let grid = SimulationGrid::new(start, Date::from_ymd(2019, 1, 11).unwrap(), "1W".parse().unwrap()).unwrap();
//! let paths = ShortRatePaths::from_rows(&[vec![0.02; 5], vec![0.04; 5]]).unwrap();
//! let fixings: FixingTable = [(Date::from_ymd(2018, 12, 12).unwrap(), 0.028)].into_iter().collect();
//!
//! let orchestrator = ExposureOrchestrator::new(
//!     InlineDispatcher,
//!     Arc::new(MemoryStore::new()),
//!     OrchestratorConfig::default(),
//! );
//! let run = orchestrator
//!     .run(&RunInputs {
//!         market: Arc::new(market),
//!         swap: Arc::new(swap),
//!         grid: &grid,
//!         params: HullWhiteParams::new(0.14, 0.008).unwrap(),
//!         paths: &paths,
//!         fixings: &fixings,
//!         first_index_fixing: 0.028,
//!     })
//!     .unwrap();
//!
//! assert_eq!(run.profile.len(), grid.size());
//! assert!(run.profile.ene.iter().all(|&v| v <= 0.0));
//! ```

#![warn(missing_docs)]

pub mod dispatch;
pub mod error;
pub mod exposure;
pub mod gather;
pub mod io;
pub mod market;
pub mod orchestrator;
pub mod path_curves;
pub mod store;
pub mod task;
pub mod valuation;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use dispatch::{submit_with_retry, DispatchError, Dispatcher, InlineDispatcher, RayonDispatcher};
pub use error::{ExposureError, StoreError};
pub use exposure::{ExposureCalculator, ExposureMatrix, ExposureProfile};
pub use gather::{gather, GatherOutcome};
pub use market::MarketCache;
pub use orchestrator::{
    ExposureOrchestrator, ExposureRun, MissingPathPolicy, OrchestratorConfig, RunInputs,
};
pub use path_curves::{PathCurveBuilder, SnapshotError};
pub use store::{DirectoryStore, MemoryStore, ResultStore, StoreStatus};
pub use task::{PathTask, PathWorker, WorkUnit};
pub use valuation::InstrumentValuer;
