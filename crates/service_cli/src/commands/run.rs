//! Run command implementation
//!
//! Simulates Hull-White short-rate paths, revalues the swap along every path
//! on a worker pool and writes the EPE/ENE profile.

use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;

use pricer_core::market_data::curves::DiscountCurve;
use pricer_kernel::mc::{simulate_fixings, ShortRatePathGenerator, ShortRatePaths};
use pricer_models::instruments::rates::{
    par_fixed_rate, FixingTable, InterestRateSwap, PricingContext,
};
use pricer_models::models::rates::HullWhiteModel;
use pricer_models::schedules::SimulationGrid;
use pricer_xva::io::write_exposure_report;
use pricer_xva::{
    DirectoryStore, ExposureCalculator, ExposureOrchestrator, ExposureRun, MarketCache,
    MemoryStore, RayonDispatcher, ResultStore, RunInputs,
};
use tracing::info;

use crate::config::RunConfig;
use crate::{CliError, Result};

/// Run the exposure simulation
pub fn run(config: &RunConfig) -> Result<()> {
    let curve_path = &config.inputs.market_curve;
    if !curve_path.exists() {
        return Err(CliError::FileNotFound(curve_path.display().to_string()));
    }

    let market = MarketCache::from_csv(curve_path, config.curve_day_count()?).market_curve()?;
    let grid = config.grid()?;
    let params = config.hull_white_params()?;

    info!(
        n_paths = config.model.n_paths,
        points = grid.size(),
        "simulating short-rate paths"
    );
    let model = HullWhiteModel::new(params, market.as_ref());
    let (paths, seed) =
        ShortRatePathGenerator::new(model, &grid, config.simulation_config()?).generate()?;
    info!(seed, "short-rate paths generated");

    let terms = config.swap_terms()?;
    let fixings = simulate_fixings(&paths, &grid, terms.index, config.model.first_index_fixing)?;
    let swap = build_swap(config, &market, &fixings)?;

    let dispatcher = RayonDispatcher::new(config.orchestration.worker_threads)?;
    info!(threads = dispatcher.num_threads(), "worker pool ready");

    let inputs = RunInputs {
        market,
        swap: Arc::new(swap),
        grid: &grid,
        params,
        paths: &paths,
        fixings: &fixings,
        first_index_fixing: config.model.first_index_fixing,
    };
    let exposure = match &config.outputs.store_dir {
        Some(dir) => execute(config, dispatcher, DirectoryStore::open(dir)?, &inputs)?,
        None => execute(config, dispatcher, MemoryStore::new(), &inputs)?,
    };

    write_report(config, &exposure)?;
    summarise(&exposure, &grid, &paths);
    Ok(())
}

/// Swap at the configured fixed rate, or at par on the market curve.
fn build_swap(
    config: &RunConfig,
    market: &DiscountCurve<f64>,
    fixings: &FixingTable,
) -> Result<InterestRateSwap> {
    let terms = config.swap_terms()?;
    match config.swap.fixed_rate {
        Some(rate) => Ok(terms.build(rate)?),
        None => {
            let provisional = terms.build(0.0)?;
            let ctx = PricingContext::new(terms.start, market, fixings);
            let rate = par_fixed_rate(&provisional, &ctx)?;
            info!(fixed_rate = rate, "solved par fixed rate");
            Ok(provisional.with_fixed_rate(rate)?)
        }
    }
}

fn execute<S: ResultStore + 'static>(
    config: &RunConfig,
    dispatcher: RayonDispatcher,
    store: S,
    inputs: &RunInputs<'_>,
) -> Result<ExposureRun> {
    let orchestrator =
        ExposureOrchestrator::new(dispatcher, Arc::new(store), config.orchestrator_config());
    Ok(orchestrator.run(inputs)?)
}

fn write_report(config: &RunConfig, exposure: &ExposureRun) -> Result<()> {
    let path = &config.outputs.report;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    write_exposure_report(
        writer,
        &exposure.dates,
        &exposure.profile.epe,
        &exposure.profile.ene,
    )?;
    info!(path = %path.display(), rows = exposure.dates.len(), "exposure report written");
    Ok(())
}

fn summarise(exposure: &ExposureRun, grid: &SimulationGrid, paths: &ShortRatePaths) {
    let profile = &exposure.profile;
    let peak_epe = ExposureCalculator::peak(&profile.epe);
    let peak_ene = profile.ene.iter().copied().fold(0.0_f64, f64::min);
    let eepe = ExposureCalculator::time_weighted_average(&profile.epe, grid.times());

    info!(
        paths = exposure.matrix.n_paths(),
        requested = paths.n_paths(),
        missing = exposure.missing.len(),
        failed = exposure.failed.len(),
        elapsed_ms = exposure.elapsed.as_millis() as u64,
        "exposure run complete"
    );

    println!("\nExposure summary");
    println!("  Paths aggregated:   {} of {}", exposure.matrix.n_paths(), paths.n_paths());
    println!("  Grid dates:         {}", grid.size());
    println!("  Peak EPE:           {:.2}", peak_epe);
    println!("  Peak ENE:           {:.2}", peak_ene);
    println!("  Time-weighted EPE:  {:.2}", eepe);
    println!("  Elapsed:            {:.3}s", exposure.elapsed.as_secs_f64());
}
