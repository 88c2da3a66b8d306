//! Turns a solver assignment into an [`AllocationReport`].
//!
//! The extractor trusts nothing about the assignment: values are rounded to
//! the nearest integer and rejected if they drift too far, bounds and link
//! constraints are re-checked, and the budget is recomputed in exact decimal
//! arithmetic with the same grossed-up cost the model used.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use super::assignment::Assignment;
use super::constraint::ConstraintGroup;
use super::problem::ProblemInstance;
use super::report::{AllocationReport, AllocationRow, ReportStatus};
use crate::error::{AllocationError, SolverError};

/// Numeric slack accepted when checking a solver's answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Maximum distance of a variable value from the nearest integer.
    pub integrality: f64,
    /// Maximum budget overrun, in currency units, treated as rounding noise.
    pub budget: Decimal,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            integrality: 1e-6,
            budget: Decimal::new(1, 4), // 0.0001
        }
    }
}

/// Build the report for `problem` from a solver `assignment`.
///
/// Deterministic: `generated_at` is stamped by the caller.
///
/// # Errors
///
/// - [`SolverError::InvalidAssignment`] if the assignment has the wrong
///   length, non-integral or out-of-bounds values, or breaks a link or
///   diversification constraint.
/// - [`AllocationError::InvariantViolation`] if the reported spend exceeds
///   initial funds by more than `tolerance.budget`.
pub fn extract(
    problem: &ProblemInstance,
    assignment: &Assignment,
    tolerance: &Tolerance,
    generated_at: DateTime<Utc>,
) -> Result<AllocationReport, AllocationError> {
    let rounded = round_assignment(problem, assignment, tolerance)?;

    for constraint in problem.constraints() {
        if constraint.group == ConstraintGroup::Budget {
            continue;
        }
        if !constraint.is_satisfied(&rounded, 1e-9) {
            return Err(invalid(format!(
                "{} constraint violated: {constraint}",
                constraint.group
            )));
        }
    }

    let params = problem.params();
    let mut rows = Vec::new();
    let mut total_return = Decimal::ZERO;
    let mut total_cost = Decimal::ZERO;

    for (i, instrument) in problem.catalog().instruments().iter().enumerate() {
        // bounds were checked above, so this is a small non-negative integer
        let lots = rounded[problem.lots_var(i)] as u32;
        if lots == 0 {
            continue;
        }
        let cost = params
            .lot_cost(instrument.price_per_lot(), lots)
            .ok_or_else(|| AllocationError::InvariantViolation {
                reason: format!("cost of {lots} lots of '{}' overflows", instrument.name()),
            })?;
        let annual_return = instrument.income_per_lot() * Decimal::from(lots);
        total_cost += cost;
        total_return += annual_return;
        rows.push(AllocationRow {
            name: instrument.name().to_string(),
            lots,
            cost,
            annual_return,
        });
    }

    let mut leftover_funds = params.initial_funds() - total_cost;
    if leftover_funds < -tolerance.budget {
        return Err(AllocationError::InvariantViolation {
            reason: format!(
                "total cost {total_cost} exceeds initial funds {} (leftover {leftover_funds})",
                params.initial_funds()
            ),
        });
    }
    if leftover_funds < Decimal::ZERO {
        debug!(%leftover_funds, "Clamping budget rounding noise to zero");
        leftover_funds = Decimal::ZERO;
    }

    let status = if assignment.optimality_unknown {
        ReportStatus::OptimalityUnknown
    } else {
        ReportStatus::Optimal
    };

    Ok(AllocationReport {
        catalog: problem.catalog().label().to_string(),
        status,
        rows,
        total_return,
        total_cost,
        leftover_funds,
        initial_funds: params.initial_funds(),
        minimum_spend: None,
        generated_at,
    })
}

/// Round every value to the nearest integer, checking drift and bounds.
fn round_assignment(
    problem: &ProblemInstance,
    assignment: &Assignment,
    tolerance: &Tolerance,
) -> Result<Vec<f64>, AllocationError> {
    if assignment.values.len() != problem.num_vars() {
        return Err(invalid(format!(
            "expected {} values, got {}",
            problem.num_vars(),
            assignment.values.len()
        )));
    }

    let mut rounded = Vec::with_capacity(assignment.values.len());
    for (index, (&value, bounds)) in assignment
        .values
        .iter()
        .zip(problem.bounds())
        .enumerate()
    {
        if !value.is_finite() {
            return Err(invalid(format!("x{index} is not finite ({value})")));
        }
        let nearest = value.round();
        if (value - nearest).abs() > tolerance.integrality {
            return Err(invalid(format!(
                "x{index} = {value} is not integral within {}",
                tolerance.integrality
            )));
        }
        if !bounds.contains(nearest, 0.0) {
            return Err(invalid(format!("x{index} = {nearest} is out of bounds")));
        }
        // normalise -0.0
        rounded.push(nearest + 0.0);
    }
    Ok(rounded)
}

fn invalid(reason: String) -> AllocationError {
    SolverError::InvalidAssignment { reason }.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Catalog, Instrument, ParameterSet, ProblemBuilder};
    use rust_decimal_macros::dec;

    fn at() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn problem(funds: Decimal, min_instruments: usize) -> ProblemInstance {
        let catalog = Catalog::try_new(
            "pair",
            vec![
                Instrument::try_new("A", dec!(100), dec!(0.05)).unwrap(),
                Instrument::try_new("B", dec!(200), dec!(0.08)).unwrap(),
            ],
        )
        .unwrap();
        let params = ParameterSet::try_new(funds, min_instruments, 3, dec!(0.10)).unwrap();
        ProblemBuilder::new().build(&catalog, &params).unwrap()
    }

    #[test]
    fn test_extracts_rows_in_catalog_order() {
        let problem = problem(dec!(1000), 2);
        let assignment = Assignment::optimal(vec![1.0, 3.0, 1.0, 1.0], 53.0);

        let report = extract(&problem, &assignment, &Tolerance::default(), at()).unwrap();

        assert_eq!(report.status, ReportStatus::Optimal);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].name, "A");
        assert_eq!(report.rows[0].lots, 1);
        assert_eq!(report.rows[0].cost, dec!(110));
        assert_eq!(report.rows[0].annual_return, dec!(5));
        assert_eq!(report.rows[1].name, "B");
        assert_eq!(report.rows[1].cost, dec!(660));
        assert_eq!(report.rows[1].annual_return, dec!(48));
        assert_eq!(report.total_cost, dec!(770));
        assert_eq!(report.total_return, dec!(53));
        assert_eq!(report.leftover_funds, dec!(230));
    }

    #[test]
    fn test_tolerates_floating_residue() {
        let problem = problem(dec!(1000), 1);
        let assignment = Assignment::optimal(vec![0.9999999, -0.0000001, 1.0000002, 0.0], 5.0);

        let report = extract(&problem, &assignment, &Tolerance::default(), at()).unwrap();

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].lots, 1);
    }

    #[test]
    fn test_rejects_fractional_lots() {
        let problem = problem(dec!(1000), 1);
        let assignment = Assignment::optimal(vec![1.4, 0.0, 1.0, 0.0], 7.0);

        let err = extract(&problem, &assignment, &Tolerance::default(), at()).unwrap_err();
        assert!(matches!(
            err,
            AllocationError::Solver(SolverError::InvalidAssignment { .. })
        ));
    }

    #[test]
    fn test_rejects_lots_without_held_flag() {
        let problem = problem(dec!(1000), 0);
        let assignment = Assignment::optimal(vec![2.0, 0.0, 0.0, 0.0], 10.0);

        let err = extract(&problem, &assignment, &Tolerance::default(), at()).unwrap_err();
        assert_eq!(err.kind(), "solver_error");
        assert!(err.to_string().contains("held-upper-link"));
    }

    #[test]
    fn test_rejects_wrong_length() {
        let problem = problem(dec!(1000), 0);
        let assignment = Assignment::optimal(vec![1.0], 5.0);
        assert!(extract(&problem, &assignment, &Tolerance::default(), at()).is_err());
    }

    #[test]
    fn test_budget_overrun_is_invariant_violation() {
        let problem = problem(dec!(500), 1);
        let assignment = Assignment::optimal(vec![0.0, 3.0, 0.0, 1.0], 48.0);

        let err = extract(&problem, &assignment, &Tolerance::default(), at()).unwrap_err();
        assert_eq!(err.kind(), "invariant_violation");
    }

    #[test]
    fn test_budget_noise_is_clamped() {
        // funds a hair below the 110 cost of one lot of A
        let problem = problem(dec!(109.99995), 1);
        let assignment = Assignment::optimal(vec![1.0, 0.0, 1.0, 0.0], 5.0);

        let report = extract(&problem, &assignment, &Tolerance::default(), at()).unwrap();
        assert_eq!(report.leftover_funds, Decimal::ZERO);
    }

    #[test]
    fn test_incumbent_flagged() {
        let problem = problem(dec!(1000), 1);
        let assignment = Assignment::incumbent(vec![1.0, 0.0, 1.0, 0.0], 5.0);

        let report = extract(&problem, &assignment, &Tolerance::default(), at()).unwrap();
        assert_eq!(report.status, ReportStatus::OptimalityUnknown);
    }

    #[test]
    fn test_empty_allocation_when_nothing_required() {
        let problem = problem(dec!(0), 0);
        let assignment = Assignment::optimal(vec![0.0; 4], 0.0);

        let report = extract(&problem, &assignment, &Tolerance::default(), at()).unwrap();
        assert!(report.rows.is_empty());
        assert_eq!(report.leftover_funds, Decimal::ZERO);
        assert_eq!(report.status, ReportStatus::Optimal);
    }

    #[test]
    fn test_same_inputs_give_identical_reports() {
        let problem = problem(dec!(1000), 2);
        let assignment = Assignment::optimal(vec![3.0, 3.0, 1.0, 1.0], 63.0);

        let first = extract(&problem, &assignment, &Tolerance::default(), at()).unwrap();
        let second = extract(&problem, &assignment, &Tolerance::default(), at()).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.generated_at, at());
    }
}
