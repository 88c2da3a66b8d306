//! Scripted [`Solver`] for testing orchestration without a MILP backend.
//!
//! Each call to `solve()` pops the next [`Script`] entry. Lot counts are
//! expanded into a full assignment (held flags set for every non-zero lot
//! count) so tests only state the allocation they want.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::{Assignment, ProblemInstance};
use crate::error::SolverError;
use crate::port::{SolveLimits, SolveOutcome, Solver};

/// One scripted solver reply.
#[derive(Debug, Clone)]
pub enum Script {
    /// Optimal assignment with these lots per instrument.
    Lots(Vec<u32>),
    /// Incumbent (limit hit) with these lots per instrument.
    Incumbent(Vec<u32>),
    /// Raw variable values, passed through untouched.
    Raw(Vec<f64>),
    Infeasible,
    Fail(SolverError),
}

/// A solver that replays a fixed list of replies.
///
/// When the script runs out every further call fails with
/// [`SolverError::Backend`].
pub struct ScriptedSolver {
    script: Mutex<VecDeque<Script>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSolver {
    pub fn new(script: Vec<Script>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of `solve()` calls, readable after the solver moves.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    fn next(&self) -> Option<Script> {
        match self.script.lock() {
            Ok(mut script) => script.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        }
    }
}

/// Expand per-instrument lots into `[lots.., held..]` variable values.
pub fn assignment_values(lots: &[u32]) -> Vec<f64> {
    lots.iter()
        .map(|&l| f64::from(l))
        .chain(lots.iter().map(|&l| if l > 0 { 1.0 } else { 0.0 }))
        .collect()
}

impl Solver for ScriptedSolver {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn solve(
        &self,
        problem: &ProblemInstance,
        limits: &SolveLimits,
    ) -> Result<SolveOutcome, SolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if limits.is_cancelled() {
            return Err(SolverError::Cancelled);
        }

        let reply = self
            .next()
            .ok_or_else(|| SolverError::Backend("script exhausted".to_string()))?;
        match reply {
            Script::Lots(lots) => {
                let values = assignment_values(&lots);
                let objective = problem.objective_value(&values);
                Ok(SolveOutcome::Solved(Assignment::optimal(values, objective)))
            }
            Script::Incumbent(lots) => {
                let values = assignment_values(&lots);
                let objective = problem.objective_value(&values);
                Ok(SolveOutcome::Solved(Assignment::incumbent(values, objective)))
            }
            Script::Raw(values) => {
                let objective = problem.objective_value(&values);
                Ok(SolveOutcome::Solved(Assignment::optimal(values, objective)))
            }
            Script::Infeasible => Ok(SolveOutcome::Infeasible),
            Script::Fail(err) => Err(err),
        }
    }
}
