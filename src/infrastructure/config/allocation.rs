//! Allocation parameter, catalog and solver sections of the config file.

use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::adapter::catalog::CatalogFormat;
use crate::adapter::solver::HighsOptions;
use crate::domain::{Tolerance, DEFAULT_TAX_RATE};

/// `[allocation]`: run parameters shared by every catalog.
///
/// Any field left out is asked for interactively (or must be given on the
/// command line when prompting is disabled).
#[derive(Debug, Clone, Deserialize)]
pub struct AllocationConfig {
    #[serde(default)]
    pub initial_funds: Option<Decimal>,

    #[serde(default)]
    pub min_instruments: Option<usize>,

    #[serde(default)]
    pub max_lots_per_instrument: Option<u32>,

    /// Purchase tax charged on lot cost; `0.10` is 10%.
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,
}

fn default_tax_rate() -> Decimal {
    DEFAULT_TAX_RATE
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            initial_funds: None,
            min_instruments: None,
            max_lots_per_instrument: None,
            tax_rate: default_tax_rate(),
        }
    }
}

/// `[catalog]`: where catalogs live and how they are laid out.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// Catalog files processed when none are given on the command line.
    #[serde(default)]
    pub paths: Vec<PathBuf>,

    #[serde(flatten)]
    pub format: CatalogFormat,
}

/// `[solver]`: MILP backend limits and acceptance tolerances.
#[derive(Debug, Clone, Deserialize)]
pub struct SolverConfig {
    /// Wall-clock limit per catalog solve, in seconds.
    #[serde(default)]
    pub time_limit_secs: Option<f64>,

    #[serde(default)]
    pub threads: Option<u32>,

    /// Show the HiGHS solver log.
    #[serde(default)]
    pub verbose: bool,

    #[serde(default = "default_integrality_tolerance")]
    pub integrality_tolerance: f64,

    #[serde(default = "default_budget_tolerance")]
    pub budget_tolerance: Decimal,
}

fn default_integrality_tolerance() -> f64 {
    Tolerance::default().integrality
}

fn default_budget_tolerance() -> Decimal {
    Tolerance::default().budget
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: None,
            threads: None,
            verbose: false,
            integrality_tolerance: default_integrality_tolerance(),
            budget_tolerance: default_budget_tolerance(),
        }
    }
}

impl SolverConfig {
    #[must_use]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    #[must_use]
    pub fn highs_options(&self) -> HighsOptions {
        HighsOptions {
            threads: self.threads,
            verbose: self.verbose,
        }
    }

    #[must_use]
    pub fn tolerance(&self) -> Tolerance {
        Tolerance {
            integrality: self.integrality_tolerance,
            budget: self.budget_tolerance,
        }
    }
}

/// `[run]`: how catalogs are scheduled.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Catalogs solved at once; 1 solves them in order, one at a time.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_concurrency() -> usize {
    1
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}
