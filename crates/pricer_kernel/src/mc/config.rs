//! Monte Carlo simulation configuration.

use super::error::ConfigError;

/// Maximum number of simulation paths allowed.
pub const MAX_PATHS: usize = 10_000_000;

/// Path simulation configuration.
///
/// Immutable configuration specifying the number of paths and the seed.
/// The number of steps is owned by the simulation grid. Use
/// [`SimulationConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use pricer_kernel::mc::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .n_paths(500)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_paths(), 500);
/// assert_eq!(config.seed(), Some(42));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Number of simulation paths.
    n_paths: usize,
    /// Optional seed for reproducibility.
    seed: Option<u64>,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Returns the number of simulation paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Returns the optional seed for reproducibility.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `n_paths` is 0 or greater than 10,000,000.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_paths == 0 || self.n_paths > MAX_PATHS {
            return Err(ConfigError::InvalidPathCount(self.n_paths));
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    n_paths: Option<usize>,
    seed: Option<u64>,
}

impl SimulationConfigBuilder {
    /// Sets the number of simulation paths.
    #[inline]
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Sets the random seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets or clears the random seed.
    #[inline]
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let config = SimulationConfig {
            n_paths: self.n_paths.unwrap_or(0),
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_paths() {
        assert_eq!(
            SimulationConfig::builder().build(),
            Err(ConfigError::InvalidPathCount(0))
        );
    }

    #[test]
    fn test_builder_rejects_too_many_paths() {
        let err = SimulationConfig::builder().n_paths(MAX_PATHS + 1).build();
        assert_eq!(err, Err(ConfigError::InvalidPathCount(MAX_PATHS + 1)));
    }

    #[test]
    fn test_maybe_seed() {
        let config = SimulationConfig::builder()
            .n_paths(10)
            .seed(1)
            .maybe_seed(None)
            .build()
            .unwrap();
        assert_eq!(config.seed(), None);
    }
}
