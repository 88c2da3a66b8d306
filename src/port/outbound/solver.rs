//! Solver port for the allocation MILP.
//!
//! The solver is an opaque collaborator: it receives a built
//! [`ProblemInstance`] and answers with an assignment, a proof of
//! infeasibility, or a [`SolverError`]. The three outcomes are kept apart so
//! that "no solution exists" is never confused with "the solver could not
//! run".
//!
//! # Ties
//!
//! When several assignments reach the same objective the solver may return
//! any of them. Callers should compare objective values, not assignments.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{Assignment, ProblemInstance};
use crate::error::SolverError;

/// Mixed-integer programming backend.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so independent catalogs can be
/// solved concurrently from one shared solver.
pub trait Solver: Send + Sync {
    /// Return the solver name for logging and configuration.
    fn name(&self) -> &'static str;

    /// Maximise the problem's objective subject to its constraints.
    ///
    /// May block for a backend-dependent time; honour `limits.time_limit`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] when no definitive answer was produced.
    /// Infeasibility is not an error: it is [`SolveOutcome::Infeasible`].
    fn solve(
        &self,
        problem: &ProblemInstance,
        limits: &SolveLimits,
    ) -> Result<SolveOutcome, SolverError>;
}

/// Definitive answer from a solver.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// An optimal assignment, or the best incumbent if a limit expired.
    Solved(Assignment),
    /// No assignment satisfies every constraint.
    Infeasible,
}

/// Per-solve limits.
#[derive(Debug, Clone, Default)]
pub struct SolveLimits {
    /// Wall-clock budget for one solve. `None` means unlimited.
    pub time_limit: Option<Duration>,
    /// Cooperative cancellation flag, checked before a solve starts.
    pub cancel: Option<CancelFlag>,
}

impl SolveLimits {
    #[must_use]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }
}

/// Shared cancellation signal.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_flag_is_shared() {
        let flag = CancelFlag::new();
        let limits = SolveLimits::default().with_cancel(flag.clone());
        assert!(!limits.is_cancelled());
        flag.cancel();
        assert!(limits.is_cancelled());
    }

    #[test]
    fn test_default_limits_are_unbounded() {
        let limits = SolveLimits::default();
        assert!(limits.time_limit.is_none());
        assert!(!limits.is_cancelled());
    }
}
