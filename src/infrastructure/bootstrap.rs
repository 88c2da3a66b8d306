//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tracing::info;

use crate::adapter::catalog::CsvCatalogLoader;
use crate::adapter::solver::HiGHSSolver;
use crate::application::Orchestrator;
use crate::infrastructure::config::settings::Config;
use crate::port::{CancelFlag, SolveLimits, Solver};

/// Build the MILP backend from configuration.
#[must_use]
pub fn build_solver(config: &Config) -> Arc<dyn Solver> {
    Arc::new(HiGHSSolver::with_options(config.solver.highs_options()))
}

/// Build the catalog loader from configuration.
#[must_use]
pub fn build_catalog_loader(config: &Config) -> CsvCatalogLoader {
    CsvCatalogLoader::new(config.catalog.format.clone())
}

/// Wire the orchestrator with the configured solver, limits and tolerances.
#[must_use]
pub fn build_orchestrator(config: &Config, cancel: CancelFlag) -> Orchestrator {
    let solver = build_solver(config);

    let mut limits = SolveLimits::default().with_cancel(cancel);
    if let Some(limit) = config.solver.time_limit() {
        limits = limits.with_time_limit(limit);
    }

    info!(
        solver = solver.name(),
        time_limit = ?limits.time_limit,
        concurrency = config.run.concurrency,
        "Orchestrator ready"
    );

    Orchestrator::new(solver)
        .with_limits(limits)
        .with_tolerance(config.solver.tolerance())
}
