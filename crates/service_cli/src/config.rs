//! Run configuration management
//!
//! Handles loading configuration from TOML files, environment variables,
//! and CLI arguments.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use pricer_core::types::{Date, DayCountConvention, Tenor};
use pricer_kernel::mc::SimulationConfig;
use pricer_models::instruments::rates::{RateIndex, SwapDirection, SwapTerms};
use pricer_models::models::rates::HullWhiteParams;
use pricer_models::schedules::SimulationGrid;
use pricer_xva::io::parse_date;
use pricer_xva::{MissingPathPolicy, OrchestratorConfig};
use serde::Deserialize;
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),
}

impl ConfigError {
    fn invalid(field: &'static str, message: impl ToString) -> Self {
        ConfigError::InvalidValue {
            field,
            message: message.to_string(),
        }
    }
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Simulation horizon and grid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatesConfig {
    /// First grid date and swap start
    pub settlement_date: String,
    /// Last grid date and swap end
    pub end_date: String,
    /// Grid step, e.g. `1W`
    pub grid_tenor: String,
}

impl Default for DatesConfig {
    fn default() -> Self {
        Self {
            settlement_date: "2018-12-14".to_string(),
            end_date: "2023-12-14".to_string(),
            grid_tenor: "1W".to_string(),
        }
    }
}

/// Hull-White parameters and path generation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Mean reversion `a`
    pub mean_reversion: f64,
    /// Volatility `σ`
    pub volatility: f64,
    /// Number of simulated paths
    pub n_paths: usize,
    /// Random seed; an entropy seed is drawn and logged when absent
    pub seed: Option<u64>,
    /// Known fixing at the first reset
    pub first_index_fixing: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            mean_reversion: 0.1421842834,
            volatility: 0.0081355969,
            n_paths: 500,
            seed: None,
            first_index_fixing: 0.0277594,
        }
    }
}

/// Vanilla swap terms.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SwapConfig {
    pub notional: f64,
    /// `payer` or `receiver` of the fixed leg
    pub direction: String,
    /// Contractual fixed rate; solved at par on the market curve when absent
    pub fixed_rate: Option<f64>,
    pub fixed_tenor: String,
    pub fixed_day_count: String,
    pub floating_index: String,
    pub floating_spread: f64,
    pub floating_day_count: String,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            notional: 10_000_000.0,
            direction: "receiver".to_string(),
            fixed_rate: None,
            fixed_tenor: "1Y".to_string(),
            fixed_day_count: "ACT/365".to_string(),
            floating_index: "USD-LIBOR-3M".to_string(),
            floating_spread: 0.001277206920730623,
            floating_day_count: "ACT/360".to_string(),
        }
    }
}

/// Input files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputsConfig {
    /// `date,discount_factor` CSV
    pub market_curve: PathBuf,
    /// Day count measuring curve time
    pub curve_day_count: String,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            market_curve: PathBuf::from("data/discount_curve.csv"),
            curve_day_count: "ACT/360".to_string(),
        }
    }
}

/// Output locations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputsConfig {
    /// Directory-backed result store; results stay in memory when absent
    pub store_dir: Option<PathBuf>,
    /// `date,epe,ene` report
    pub report: PathBuf,
}

impl Default for OutputsConfig {
    fn default() -> Self {
        Self {
            store_dir: None,
            report: PathBuf::from("exposure_report.csv"),
        }
    }
}

/// Dispatch and gather settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrchestrationConfig {
    /// Worker threads; `0` uses one per core
    pub worker_threads: usize,
    pub gather_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub max_dispatch_retries: u32,
    pub missing_path_policy: MissingPathPolicy,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        let defaults = OrchestratorConfig::default();
        Self {
            worker_threads: 0,
            gather_timeout_secs: defaults.gather_timeout.as_secs(),
            poll_interval_ms: defaults.poll_interval.as_millis() as u64,
            max_dispatch_retries: defaults.max_dispatch_retries,
            missing_path_policy: defaults.missing_path_policy,
        }
    }
}

/// Complete configuration of one exposure run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    pub dates: DatesConfig,
    pub model: ModelConfig,
    pub swap: SwapConfig,
    pub inputs: InputsConfig,
    pub outputs: OutputsConfig,
    pub orchestration: OrchestrationConfig,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

impl RunConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Override with `EXPOSURE_*` environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Override from an arbitrary variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T: FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::EnvError(format!("{}: cannot parse '{}'", key, value)))
        }

        if let Some(level) = lookup("EXPOSURE_LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(v) = lookup("EXPOSURE_N_PATHS") {
            self.model.n_paths = parsed("EXPOSURE_N_PATHS", v)?;
        }
        if let Some(v) = lookup("EXPOSURE_SEED") {
            self.model.seed = Some(parsed("EXPOSURE_SEED", v)?);
        }
        if let Some(v) = lookup("EXPOSURE_MARKET_CURVE") {
            self.inputs.market_curve = PathBuf::from(v);
        }
        if let Some(v) = lookup("EXPOSURE_STORE_DIR") {
            self.outputs.store_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("EXPOSURE_REPORT") {
            self.outputs.report = PathBuf::from(v);
        }
        if let Some(v) = lookup("EXPOSURE_WORKER_THREADS") {
            self.orchestration.worker_threads = parsed("EXPOSURE_WORKER_THREADS", v)?;
        }
        if let Some(v) = lookup("EXPOSURE_GATHER_TIMEOUT_SECS") {
            self.orchestration.gather_timeout_secs = parsed("EXPOSURE_GATHER_TIMEOUT_SECS", v)?;
        }
        if let Some(v) = lookup("EXPOSURE_MISSING_PATH_POLICY") {
            self.orchestration.missing_path_policy = parsed("EXPOSURE_MISSING_PATH_POLICY", v)?;
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliOverrides) -> Result<(), ConfigError> {
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        if let Some(n) = cli.n_paths {
            self.model.n_paths = n;
        }
        if let Some(seed) = cli.seed {
            self.model.seed = Some(seed);
        }
        if let Some(path) = &cli.market_curve {
            self.inputs.market_curve = path.clone();
        }
        if let Some(dir) = &cli.store_dir {
            self.outputs.store_dir = Some(dir.clone());
        }
        if let Some(report) = &cli.report {
            self.outputs.report = report.clone();
        }
        if let Some(threads) = cli.worker_threads {
            self.orchestration.worker_threads = threads;
        }
        if let Some(policy) = cli.missing_path_policy {
            self.orchestration.missing_path_policy = policy;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid()?;
        self.hull_white_params()?;
        self.simulation_config()?;
        self.swap_terms()?;
        self.curve_day_count()?;

        let first = self.model.first_index_fixing;
        if !first.is_finite() {
            return Err(ConfigError::invalid("model.first_index_fixing", first));
        }
        if let Some(rate) = self.swap.fixed_rate {
            if !rate.is_finite() {
                return Err(ConfigError::invalid("swap.fixed_rate", rate));
            }
        }
        if self.orchestration.poll_interval_ms == 0 {
            return Err(ConfigError::invalid(
                "orchestration.poll_interval_ms",
                "must be positive",
            ));
        }
        if self.orchestration.gather_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "orchestration.gather_timeout_secs",
                "must be positive",
            ));
        }
        Ok(())
    }

    /// Grid start
    pub fn settlement_date(&self) -> Result<Date, ConfigError> {
        parse_date(&self.dates.settlement_date)
            .map_err(|e| ConfigError::invalid("dates.settlement_date", e))
    }

    /// Grid end
    pub fn end_date(&self) -> Result<Date, ConfigError> {
        parse_date(&self.dates.end_date).map_err(|e| ConfigError::invalid("dates.end_date", e))
    }

    /// Simulation grid
    pub fn grid(&self) -> Result<SimulationGrid, ConfigError> {
        let tenor: Tenor = self
            .dates
            .grid_tenor
            .parse()
            .map_err(|e| ConfigError::invalid("dates.grid_tenor", e))?;
        SimulationGrid::new(self.settlement_date()?, self.end_date()?, tenor)
            .map_err(|e| ConfigError::invalid("dates", e))
    }

    /// Hull-White parameters
    pub fn hull_white_params(&self) -> Result<HullWhiteParams, ConfigError> {
        HullWhiteParams::new(self.model.mean_reversion, self.model.volatility)
            .map_err(|e| ConfigError::invalid("model", e))
    }

    /// Path generation settings
    pub fn simulation_config(&self) -> Result<SimulationConfig, ConfigError> {
        SimulationConfig::builder()
            .n_paths(self.model.n_paths)
            .maybe_seed(self.model.seed)
            .build()
            .map_err(|e| ConfigError::invalid("model.n_paths", e))
    }

    /// Swap terms spanning the simulation horizon
    pub fn swap_terms(&self) -> Result<SwapTerms, ConfigError> {
        let swap = &self.swap;
        let notional = swap.notional;
        if !(notional.is_finite() && notional > 0.0) {
            return Err(ConfigError::invalid("swap.notional", notional));
        }
        if !swap.floating_spread.is_finite() {
            return Err(ConfigError::invalid("swap.floating_spread", swap.floating_spread));
        }
        Ok(SwapTerms {
            start: self.settlement_date()?,
            end: self.end_date()?,
            notional,
            direction: SwapDirection::from_str(&swap.direction)
                .map_err(|e| ConfigError::invalid("swap.direction", e))?,
            fixed_tenor: swap
                .fixed_tenor
                .parse()
                .map_err(|e| ConfigError::invalid("swap.fixed_tenor", e))?,
            fixed_day_count: DayCountConvention::from_str(&swap.fixed_day_count)
                .map_err(|e| ConfigError::invalid("swap.fixed_day_count", e))?,
            floating_spread: swap.floating_spread,
            index: RateIndex::from_str(&swap.floating_index)
                .map_err(|e| ConfigError::invalid("swap.floating_index", e))?,
            floating_day_count: DayCountConvention::from_str(&swap.floating_day_count)
                .map_err(|e| ConfigError::invalid("swap.floating_day_count", e))?,
        })
    }

    /// Day count measuring market curve time
    pub fn curve_day_count(&self) -> Result<DayCountConvention, ConfigError> {
        DayCountConvention::from_str(&self.inputs.curve_day_count)
            .map_err(|e| ConfigError::invalid("inputs.curve_day_count", e))
    }

    /// Orchestrator settings
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        let o = &self.orchestration;
        OrchestratorConfig {
            gather_timeout: Duration::from_secs(o.gather_timeout_secs),
            poll_interval: Duration::from_millis(o.poll_interval_ms),
            max_dispatch_retries: o.max_dispatch_retries,
            missing_path_policy: o.missing_path_policy,
        }
    }
}

/// CLI overrides
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub n_paths: Option<usize>,
    pub seed: Option<u64>,
    pub market_curve: Option<PathBuf>,
    pub store_dir: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub worker_threads: Option<usize>,
    pub missing_path_policy: Option<MissingPathPolicy>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(
    config_file: Option<&Path>,
    cli: &CliOverrides,
) -> Result<RunConfig, ConfigError> {
    let mut config = match config_file {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::default(),
    };
    config.apply_env()?;
    config.merge_with_cli(cli)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = RunConfig::default();
        config.validate().unwrap();

        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.model.n_paths, 500);
        assert_eq!(config.swap.fixed_rate, None);
        assert_eq!(config.grid().unwrap().size(), 262);
        assert_eq!(
            config.orchestration.missing_path_policy,
            MissingPathPolicy::Fail
        );
    }

    #[test]
    fn test_default_swap_terms() {
        let terms = RunConfig::default().swap_terms().unwrap();
        assert_eq!(terms.direction, SwapDirection::ReceiveFixed);
        assert_eq!(terms.index, RateIndex::UsdLibor3M);
        assert_eq!(terms.fixed_day_count, DayCountConvention::ActualActual365);
        assert_eq!(terms.floating_day_count, DayCountConvention::ActualActual360);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("warn").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("verbose").is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RunConfig::from_toml(
            r#"
            log_level = "debug"

            [model]
            n_paths = 20
            seed = 7

            [orchestration]
            missing_path_policy = "exclude"
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.model.n_paths, 20);
        assert_eq!(config.model.seed, Some(7));
        assert_eq!(config.model.mean_reversion, 0.1421842834);
        assert_eq!(
            config.orchestration.missing_path_policy,
            MissingPathPolicy::Exclude
        );
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[swap]\nfixed_rate = 0.0285\ndirection = \"payer\"").unwrap();

        let config = RunConfig::from_file(file.path()).unwrap();
        assert_eq!(config.swap.fixed_rate, Some(0.0285));
        assert_eq!(
            config.swap_terms().unwrap().direction,
            SwapDirection::PayFixed
        );
    }

    #[test]
    fn test_missing_file() {
        let result = RunConfig::from_file(Path::new("/nonexistent/exposure.toml"));
        assert!(matches!(result, Err(ConfigError::FileError(_))));
    }

    #[test]
    fn test_shipped_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/exposure.toml");
        let config = RunConfig::from_file(&path).unwrap();
        config.validate().unwrap();
        assert_eq!(config.model.seed, Some(42));
    }

    #[test]
    fn test_bad_log_level_in_file() {
        assert!(RunConfig::from_toml("log_level = \"loud\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("EXPOSURE_N_PATHS", "64"),
            ("EXPOSURE_SEED", "42"),
            ("EXPOSURE_MISSING_PATH_POLICY", "exclude"),
        ]
        .into_iter()
        .collect();

        let mut config = RunConfig::default();
        config
            .apply_env_from(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.model.n_paths, 64);
        assert_eq!(config.model.seed, Some(42));
        assert_eq!(
            config.orchestration.missing_path_policy,
            MissingPathPolicy::Exclude
        );
    }

    #[test]
    fn test_bad_env_value() {
        let mut config = RunConfig::default();
        let result = config.apply_env_from(|key| {
            (key == "EXPOSURE_N_PATHS").then(|| "many".to_string())
        });
        assert!(matches!(result, Err(ConfigError::EnvError(_))));
    }

    #[test]
    fn test_cli_takes_precedence() {
        let mut config = RunConfig::default();
        config
            .apply_env_from(|key| (key == "EXPOSURE_N_PATHS").then(|| "64".to_string()))
            .unwrap();
        config
            .merge_with_cli(&CliOverrides {
                n_paths: Some(8),
                ..CliOverrides::default()
            })
            .unwrap();
        assert_eq!(config.model.n_paths, 8);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = RunConfig::default();
        config.model.n_paths = 0;
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.model.volatility = -0.01;
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.dates.end_date = "2017-01-01".to_string();
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.swap.floating_index = "SOFR".to_string();
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.orchestration.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }
}
