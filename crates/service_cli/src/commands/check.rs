//! Check command implementation
//!
//! Validates the resolved configuration and loads the market curve without
//! simulating anything.

use pricer_xva::MarketCache;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::{CliError, Result};

/// Run the check command
pub fn run(config: &RunConfig) -> Result<()> {
    info!("Checking configuration...");

    let grid = config.grid()?;
    let params = config.hull_white_params()?;
    info!(
        start = %grid.start(),
        end = %grid.end(),
        points = grid.size(),
        "simulation grid"
    );
    info!(
        a = params.mean_reversion(),
        sigma = params.volatility(),
        n_paths = config.model.n_paths,
        "hull-white model"
    );

    let path = &config.inputs.market_curve;
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let curve = MarketCache::from_csv(path, config.curve_day_count()?).market_curve()?;
    if curve.reference_date() > grid.start() {
        warn!(
            reference = %curve.reference_date(),
            "market curve starts after settlement; early grid dates will be rejected"
        );
    }

    println!("Configuration OK");
    Ok(())
}
