//! Divvy - dividend portfolio allocation as a mixed-integer program.
//!
//! Given catalogs of dividend-paying instruments (lot price and yield), a
//! cash budget net of purchase tax, a per-instrument lot limit and a minimum
//! number of distinct holdings, divvy finds the whole-lot allocation that
//! maximises projected annual dividend income.
//!
//! # Architecture
//!
//! - **`domain`** - Instruments, parameters, the problem builder and the
//!   post-solve extractor. Pure and solver-agnostic.
//! - **`port`** - The [`Solver`](port::Solver) trait the domain solves through.
//! - **`adapter`** - HiGHS solver backend (`good_lp`), CSV catalog loader
//!   and the `clap` command line.
//! - **`application`** - Runs build, solve and extract once per catalog.
//! - **`infrastructure`** - TOML configuration, logging and wiring.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use divvy::adapter::catalog::{CatalogFormat, CsvCatalogLoader};
//! use divvy::adapter::solver::HiGHSSolver;
//! use divvy::application::Orchestrator;
//! use divvy::domain::{ParameterSet, DEFAULT_TAX_RATE};
//! use rust_decimal_macros::dec;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = CsvCatalogLoader::new(CatalogFormat::default()).load("owned.csv")?;
//!     let params = ParameterSet::try_new(dec!(10000), 3, 5, DEFAULT_TAX_RATE)?;
//!
//!     let orchestrator = Orchestrator::new(Arc::new(HiGHSSolver::new()));
//!     let report = orchestrator.allocate(&catalog, &params)?;
//!     println!("{}", report.total_return);
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
