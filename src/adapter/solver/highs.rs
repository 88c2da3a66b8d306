//! HiGHS solver implementation via good_lp.
//!
//! HiGHS is a high-performance open-source linear/mixed-integer programming
//! solver. This adapter translates a [`ProblemInstance`] into a good_lp model,
//! runs it with a zero relative MIP gap, and maps the outcome back onto the
//! solver port.
//!
//! Time limits: HiGHS reports why it stopped. A solution whose status is
//! anything but proven optimal is returned as an incumbent flagged
//! `optimality_unknown`. When a limit was set and HiGHS stopped without any
//! feasible point, the solve fails with [`SolverError::Timeout`].

use std::time::Instant;

use good_lp::solvers::highs::highs;
use good_lp::{
    constraint, variable, variables, Expression, ResolutionError, Solution, SolutionStatus,
    SolverModel, Variable,
};
use tracing::{debug, warn};

use crate::domain::constraint::decimal_to_f64;
use crate::domain::{Assignment, ConstraintSense, ProblemInstance};
use crate::error::SolverError;
use crate::port::{SolveLimits, SolveOutcome, Solver};

/// Tuning knobs passed through to HiGHS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighsOptions {
    /// Worker threads; HiGHS picks when unset.
    pub threads: Option<u32>,
    /// Let HiGHS print its own progress log.
    pub verbose: bool,
}

/// HiGHS-based MILP solver.
#[derive(Debug, Default, Clone)]
pub struct HiGHSSolver {
    options: HighsOptions,
}

impl HiGHSSolver {
    /// Create a new HiGHS solver instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: HighsOptions) -> Self {
        Self { options }
    }
}

impl Solver for HiGHSSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn solve(
        &self,
        problem: &ProblemInstance,
        limits: &SolveLimits,
    ) -> Result<SolveOutcome, SolverError> {
        if limits.is_cancelled() {
            return Err(SolverError::Cancelled);
        }
        solve_with_good_lp(problem, limits, &self.options)
    }
}

/// Internal solver implementation using good_lp.
fn solve_with_good_lp(
    problem: &ProblemInstance,
    limits: &SolveLimits,
    options: &HighsOptions,
) -> Result<SolveOutcome, SolverError> {
    let integer_vars = problem.integer_vars();

    // Create variables
    let mut vars = variables!();
    let mut var_list: Vec<Variable> = Vec::with_capacity(problem.num_vars());

    for (i, bounds) in problem.bounds().iter().enumerate() {
        let mut v = variable();

        if let Some(lb) = bounds.lower {
            v = v.min(decimal_to_f64(lb));
        }
        if let Some(ub) = bounds.upper {
            v = v.max(decimal_to_f64(ub));
        }
        if integer_vars.contains(&i) {
            v = v.integer();
        }

        var_list.push(vars.add(v));
    }

    let objective: Expression = var_list
        .iter()
        .zip(problem.objective())
        .map(|(v, c)| decimal_to_f64(*c) * *v)
        .sum();

    let mut model = vars.maximise(&objective).using(highs);
    model.set_verbose(options.verbose);
    model = model.set_option("mip_rel_gap", 0.0);

    if let Some(limit) = limits.time_limit {
        model = model.set_time_limit(limit.as_secs_f64());
    }
    if let Some(threads) = options.threads {
        model = model.set_threads(threads);
    }

    for constr in problem.constraints() {
        let lhs: Expression = constr
            .terms
            .iter()
            .map(|(index, coeff)| decimal_to_f64(*coeff) * var_list[*index])
            .sum();
        let rhs = decimal_to_f64(constr.rhs);

        model = match constr.sense {
            ConstraintSense::GreaterEqual => model.with(constraint!(lhs >= rhs)),
            ConstraintSense::LessEqual => model.with(constraint!(lhs <= rhs)),
            ConstraintSense::Equal => model.with(constraint!(lhs == rhs)),
        };
    }

    let started = Instant::now();
    let result = model.solve();
    let elapsed = started.elapsed();
    debug!(
        catalog = problem.catalog().label(),
        elapsed_ms = elapsed.as_millis() as u64,
        "HiGHS solve finished"
    );

    match result {
        Ok(solution) => {
            let values: Vec<f64> = var_list.iter().map(|v| solution.value(*v)).collect();
            let objective = problem.objective_value(&values);
            Ok(SolveOutcome::Solved(assignment_for(
                solution.status(),
                values,
                objective,
                problem,
            )))
        }
        Err(err) => map_resolution_error(err, limits),
    }
}

/// Wrap solver values according to why HiGHS stopped.
fn assignment_for(
    status: SolutionStatus,
    values: Vec<f64>,
    objective: f64,
    problem: &ProblemInstance,
) -> Assignment {
    match status {
        SolutionStatus::Optimal => Assignment::optimal(values, objective),
        SolutionStatus::TimeLimit | SolutionStatus::GapLimit => {
            warn!(
                catalog = problem.catalog().label(),
                ?status,
                "Solve stopped early; returning best incumbent"
            );
            Assignment::incumbent(values, objective)
        }
    }
}

/// Map a failed HiGHS run onto the solver port.
///
/// good_lp reports a limit hit with no feasible point as
/// `Other("NoSolutionFound")`; with a time limit set that is a timeout.
fn map_resolution_error(
    err: ResolutionError,
    limits: &SolveLimits,
) -> Result<SolveOutcome, SolverError> {
    match err {
        ResolutionError::Infeasible => Ok(SolveOutcome::Infeasible),
        ResolutionError::Unbounded => Err(SolverError::Unbounded),
        ResolutionError::Other(reason @ "NoSolutionFound") => match limits.time_limit {
            Some(limit) => Err(SolverError::Timeout { limit }),
            None => Err(SolverError::Backend(reason.to_string())),
        },
        other => Err(SolverError::Backend(other.to_string())),
    }
}
