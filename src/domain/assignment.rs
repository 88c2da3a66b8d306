//! Raw variable values returned by a solver.

use serde::Serialize;

/// Values for every variable of a [`ProblemInstance`](super::ProblemInstance),
/// in the instance's variable order.
///
/// Values are floating point because MILP backends work on relaxations;
/// the extractor rounds and checks them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    /// One value per variable.
    pub values: Vec<f64>,
    /// Objective value reported alongside the values.
    pub objective: f64,
    /// True when the solver stopped at a limit before proving optimality;
    /// the values are its best incumbent.
    pub optimality_unknown: bool,
}

impl Assignment {
    /// A proven-optimal assignment.
    #[must_use]
    pub fn optimal(values: Vec<f64>, objective: f64) -> Self {
        Self {
            values,
            objective,
            optimality_unknown: false,
        }
    }

    /// Best incumbent found before a limit expired.
    #[must_use]
    pub fn incumbent(values: Vec<f64>, objective: f64) -> Self {
        Self {
            values,
            objective,
            optimality_unknown: true,
        }
    }
}
