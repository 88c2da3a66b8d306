//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings. It is
//! loaded from a TOML file; every section is optional.
//!
//! # Example
//!
//! ```no_run
//! use divvy::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("divvy.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::allocation::{AllocationConfig, CatalogConfig, RunConfig, SolverConfig};
use super::logging::LoggingConfig;
use crate::error::{ConfigError, Result};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "divvy.toml";

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Run parameters shared across catalogs.
    #[serde(default)]
    pub allocation: AllocationConfig,

    /// Catalog locations and column layout.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Solver limits and tolerances.
    #[serde(default)]
    pub solver: SolverConfig,

    /// Scheduling of catalog solves.
    #[serde(default)]
    pub run: RunConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`] when the file exists.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    ///
    /// Checks that values are within acceptable ranges.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        let allocation = &self.allocation;
        if let Some(funds) = allocation.initial_funds {
            if funds < Decimal::ZERO {
                return Err(ConfigError::InvalidValue {
                    field: "initial_funds",
                    reason: "must be 0 or greater".to_string(),
                }
                .into());
            }
        }
        if allocation.max_lots_per_instrument == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "max_lots_per_instrument",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if allocation.tax_rate < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "tax_rate",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }

        if let Some(secs) = self.solver.time_limit_secs {
            if secs <= 0.0 || Duration::try_from_secs_f64(secs).is_err() {
                return Err(ConfigError::InvalidValue {
                    field: "time_limit_secs",
                    reason: "must be a positive number of seconds".to_string(),
                }
                .into());
            }
        }
        if self.solver.threads == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "threads",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        let integrality = self.solver.integrality_tolerance;
        if !(integrality > 0.0 && integrality < 0.5) {
            return Err(ConfigError::InvalidValue {
                field: "integrality_tolerance",
                reason: "must be between 0 and 0.5".to_string(),
            }
            .into());
        }
        if self.solver.budget_tolerance < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "budget_tolerance",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }

        let format = &self.catalog.format;
        if !format.delimiter.is_ascii() {
            return Err(ConfigError::InvalidValue {
                field: "delimiter",
                reason: "must be a single ASCII character".to_string(),
            }
            .into());
        }
        for (field, column) in [
            ("name_column", &format.name_column),
            ("price_column", &format.price_column),
            ("yield_column", &format.yield_column),
        ] {
            if column.trim().is_empty() {
                return Err(ConfigError::MissingField { field }.into());
            }
        }

        if self.run.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "concurrency",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::catalog::YieldUnit;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.allocation.tax_rate, dec!(0.10));
        assert!(config.allocation.initial_funds.is_none());
        assert_eq!(config.catalog.format.name_column, "Stock Name");
        assert_eq!(config.catalog.format.yield_unit, YieldUnit::Percent);
        assert_eq!(config.run.concurrency, 1);
        assert!(config.solver.time_limit().is_none());
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
[logging]
level = "debug"
format = "json"

[allocation]
initial_funds = 25000
min_instruments = 4
max_lots_per_instrument = 10
tax_rate = 0.05

[catalog]
paths = ["owned.csv", "watchlist.csv"]
yield_unit = "fraction"
delimiter = ";"
name_column = "Ticker"

[solver]
time_limit_secs = 2.5
threads = 2

[run]
concurrency = 2
"#;
        let config = Config::parse_toml(toml).unwrap();
        assert_eq!(config.allocation.initial_funds, Some(dec!(25000)));
        assert_eq!(config.allocation.min_instruments, Some(4));
        assert_eq!(config.allocation.tax_rate, dec!(0.05));
        assert_eq!(config.catalog.paths.len(), 2);
        assert_eq!(config.catalog.format.delimiter, ';');
        assert_eq!(config.catalog.format.name_column, "Ticker");
        assert_eq!(config.catalog.format.price_column, "Price per Lot (MYR)");
        assert_eq!(config.catalog.format.yield_unit, YieldUnit::Fraction);
        assert_eq!(
            config.solver.time_limit(),
            Some(std::time::Duration::from_millis(2500))
        );
        assert_eq!(config.solver.highs_options().threads, Some(2));
        assert_eq!(config.run.concurrency, 2);
    }

    #[test]
    fn test_rejects_zero_max_lots() {
        let result = Config::parse_toml("[allocation]\nmax_lots_per_instrument = 0\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "max_lots_per_instrument",
                ..
            }))
        ));
    }

    #[test]
    fn test_rejects_non_positive_time_limit() {
        let result = Config::parse_toml("[solver]\ntime_limit_secs = 0\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "time_limit_secs",
                ..
            }))
        ));
    }

    #[test]
    fn test_rejects_time_limit_beyond_duration_range() {
        let result = Config::parse_toml("[solver]\ntime_limit_secs = 1e300\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "time_limit_secs",
                ..
            }))
        ));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let result = Config::parse_toml("[allocation\n");
        assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
    }
}
