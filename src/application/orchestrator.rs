//! Run orchestration: build, solve and extract once per catalog.
//!
//! Catalogs are independent problems. A failure in one never stops or
//! alters the others, and results come back in input order whether the run
//! is sequential or concurrent.

use std::sync::Arc;

use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{error, info, info_span, warn};

use crate::domain::{
    extract, AllocationReport, Catalog, ParameterSet, ProblemBuilder, Tolerance,
};
use crate::error::{AllocationError, SolverError};
use crate::port::{SolveLimits, SolveOutcome, Solver};

/// Outcome for one catalog of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogResult {
    /// Catalog label.
    pub catalog: String,
    /// The report, or why there is none.
    #[serde(serialize_with = "serialize_outcome")]
    pub outcome: Result<AllocationReport, AllocationError>,
}

impl CatalogResult {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

fn serialize_outcome<S: serde::Serializer>(
    outcome: &Result<AllocationReport, AllocationError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeMap;

    let mut map = serializer.serialize_map(Some(1))?;
    match outcome {
        Ok(report) => map.serialize_entry("report", report)?,
        Err(err) => map.serialize_entry(
            "error",
            &serde_json::json!({ "kind": err.kind(), "message": err.to_string() }),
        )?,
    }
    map.end()
}

/// Sequences problem building, solving and extraction.
#[derive(Clone)]
pub struct Orchestrator {
    solver: Arc<dyn Solver>,
    builder: ProblemBuilder,
    limits: SolveLimits,
    tolerance: Tolerance,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("solver", &self.solver.name())
            .field("limits", &self.limits)
            .field("tolerance", &self.tolerance)
            .finish()
    }
}

impl Orchestrator {
    #[must_use]
    pub fn new(solver: Arc<dyn Solver>) -> Self {
        Self {
            solver,
            builder: ProblemBuilder::new(),
            limits: SolveLimits::default(),
            tolerance: Tolerance::default(),
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: SolveLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Allocate funds across one catalog.
    ///
    /// Infeasibility is a report, not an error: the returned report is empty
    /// and carries the minimum spend the diversification floor requires.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError`] for invalid input, solver failures and
    /// post-solve invariant violations.
    pub fn allocate(
        &self,
        catalog: &Catalog,
        params: &ParameterSet,
    ) -> Result<AllocationReport, AllocationError> {
        let problem = self.builder.build(catalog, params)?;

        match self.solver.solve(&problem, &self.limits)? {
            SolveOutcome::Solved(assignment) => {
                let report = extract(&problem, &assignment, &self.tolerance, Utc::now())?;
                info!(
                    status = %report.status,
                    held = report.instruments_held(),
                    total_return = %report.total_return,
                    total_cost = %report.total_cost,
                    leftover = %report.leftover_funds,
                    "Allocation solved"
                );
                Ok(report)
            }
            SolveOutcome::Infeasible => {
                let minimum_spend = problem.minimum_spend();
                warn!(
                    %minimum_spend,
                    funds = %params.initial_funds(),
                    min_instruments = params.min_instruments(),
                    "No feasible allocation"
                );
                Ok(AllocationReport::infeasible(
                    catalog.label(),
                    params.initial_funds(),
                    minimum_spend,
                    Utc::now(),
                ))
            }
        }
    }

    /// Allocate a single catalog and wrap the outcome.
    #[must_use]
    pub fn run_one(&self, catalog: &Catalog, params: &ParameterSet) -> CatalogResult {
        let span = info_span!("catalog", label = catalog.label(), solver = self.solver.name());
        let _guard = span.enter();

        let outcome = self.allocate(catalog, params);
        if let Err(err) = &outcome {
            error!(kind = err.kind(), error = %err, "Catalog allocation failed");
        }
        CatalogResult {
            catalog: catalog.label().to_string(),
            outcome,
        }
    }

    /// Process catalogs one after another, in order.
    #[must_use]
    pub fn run(&self, catalogs: &[Catalog], params: &ParameterSet) -> Vec<CatalogResult> {
        catalogs
            .iter()
            .map(|catalog| self.run_one(catalog, params))
            .collect()
    }

    /// Process up to `concurrency` catalogs at once on the blocking pool.
    ///
    /// Results keep input order.
    pub async fn run_concurrent(
        &self,
        catalogs: Vec<Catalog>,
        params: &ParameterSet,
        concurrency: usize,
    ) -> Vec<CatalogResult> {
        let concurrency = concurrency.max(1);
        stream::iter(catalogs)
            .map(|catalog| {
                let this = self.clone();
                let params = params.clone();
                let label = catalog.label().to_string();
                async move {
                    let handle =
                        tokio::task::spawn_blocking(move || this.run_one(&catalog, &params));
                    match handle.await {
                        Ok(result) => result,
                        Err(join_err) => CatalogResult {
                            catalog: label,
                            outcome: Err(SolverError::Backend(format!(
                                "solver task failed: {join_err}"
                            ))
                            .into()),
                        },
                    }
                }
            })
            .buffered(concurrency)
            .collect()
            .await
    }
}
