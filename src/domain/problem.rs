//! Mixed-integer formulation of the dividend allocation problem.
//!
//! For a catalog of `n` instruments the model has `2n` variables laid out as
//! two contiguous blocks:
//!
//! ```text
//! x[0 .. n)    lots[i]   integer, 0 <= lots[i] <= max_lots
//! x[n .. 2n)   held[i]   binary
//! ```
//!
//! and maximises projected dividend income
//!
//! ```text
//! maximise    sum_i lots[i] * price[i] * yield[i]
//! subject to  sum_i lots[i] * price[i] * (1 + tax) <= funds        (budget)
//!             sum_i held[i] >= min_instruments                     (diversification)
//!             lots[i] - max_lots * held[i] <= 0          for all i (held-upper-link)
//!             lots[i] - held[i] >= 0                     for all i (held-lower-link)
//! ```
//!
//! The two link groups together make `held[i] = 1` exactly when
//! `lots[i] >= 1`. Neither one alone is sufficient.
//!
//! The builder imposes no tie-break between equally good assignments;
//! which optimum is returned is up to the solver.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::constraint::{Constraint, ConstraintGroup, VariableBounds};
use super::error::DomainError;
use super::instrument::Catalog;
use super::money::{gross_up, Price};
use super::params::ParameterSet;

/// Whether a variable is a lot count or a held indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    /// Integer number of lots bought.
    Lots,
    /// Binary flag: instrument is part of the portfolio.
    Held,
}

/// A built allocation model. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemInstance {
    catalog: Catalog,
    params: ParameterSet,
    objective: Vec<Decimal>,
    bounds: Vec<VariableBounds>,
    kinds: Vec<VariableKind>,
    constraints: Vec<Constraint>,
    minimum_spend: Price,
}

impl ProblemInstance {
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Objective coefficients to be maximised, one per variable.
    #[must_use]
    pub fn objective(&self) -> &[Decimal] {
        &self.objective
    }

    #[must_use]
    pub fn bounds(&self) -> &[VariableBounds] {
        &self.bounds
    }

    #[must_use]
    pub fn kinds(&self) -> &[VariableKind] {
        &self.kinds
    }

    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    /// Number of instruments, `n`.
    #[must_use]
    pub fn num_instruments(&self) -> usize {
        self.catalog.len()
    }

    /// Index of `lots[i]`.
    #[must_use]
    pub const fn lots_var(&self, instrument: usize) -> usize {
        instrument
    }

    /// Index of `held[i]`.
    #[must_use]
    pub fn held_var(&self, instrument: usize) -> usize {
        self.catalog.len() + instrument
    }

    /// Indices of variables the solver must keep integral (all of them).
    #[must_use]
    pub fn integer_vars(&self) -> Vec<usize> {
        (0..self.num_vars()).collect()
    }

    /// Cheapest spend that satisfies the diversification floor: one lot of
    /// each of the `min_instruments` cheapest instruments, grossed up.
    ///
    /// The model is feasible exactly when this does not exceed funds.
    #[must_use]
    pub const fn minimum_spend(&self) -> Price {
        self.minimum_spend
    }

    /// Objective value at `values`.
    #[must_use]
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective
            .iter()
            .zip(values)
            .map(|(coeff, value)| super::constraint::decimal_to_f64(*coeff) * value)
            .sum()
    }
}

/// Builds [`ProblemInstance`]s from a catalog and parameter set.
///
/// Pure: the same inputs always produce a structurally identical instance.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProblemBuilder;

impl ProblemBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Build the allocation model for one catalog.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DiversificationExceedsCatalog`] when the
    /// parameters ask for more distinct instruments than the catalog holds,
    /// and [`DomainError::AmountOverflow`] when buying `max_lots` of every
    /// instrument would not fit a `Decimal`. Bounding that total keeps every
    /// cost and income sum computed after the solve in range. Instrument and
    /// parameter ranges are enforced by their constructors.
    pub fn build(
        &self,
        catalog: &Catalog,
        params: &ParameterSet,
    ) -> Result<ProblemInstance, DomainError> {
        let n = catalog.len();
        if catalog.is_empty() {
            return Err(DomainError::EmptyCatalog {
                catalog: catalog.label().to_string(),
            });
        }
        if params.min_instruments() > n {
            return Err(DomainError::DiversificationExceedsCatalog {
                catalog: catalog.label().to_string(),
                required: params.min_instruments(),
                available: n,
            });
        }

        let max_lots = Decimal::from(params.max_lots());
        let lots = |i: usize| i;
        let held = |i: usize| n + i;

        let mut objective = Vec::with_capacity(2 * n);
        let mut bounds = Vec::with_capacity(2 * n);
        let mut kinds = Vec::with_capacity(2 * n);

        for instrument in catalog.instruments() {
            objective.push(instrument.income_per_lot());
            bounds.push(VariableBounds::bounded(Decimal::ZERO, max_lots));
            kinds.push(VariableKind::Lots);
        }
        for _ in catalog.instruments() {
            objective.push(Decimal::ZERO);
            bounds.push(VariableBounds::binary());
            kinds.push(VariableKind::Held);
        }

        let mut budget_terms = Vec::with_capacity(n);
        let mut cost_ceiling = Decimal::ZERO;
        let mut income_ceiling = Decimal::ZERO;
        for (i, instrument) in catalog.instruments().iter().enumerate() {
            let overflow = || DomainError::AmountOverflow {
                name: instrument.name().to_string(),
            };
            let lot_cost =
                gross_up(instrument.price_per_lot(), params.tax_rate()).ok_or_else(overflow)?;
            cost_ceiling = lot_cost
                .checked_mul(max_lots)
                .and_then(|cost| cost_ceiling.checked_add(cost))
                .ok_or_else(overflow)?;
            income_ceiling = instrument
                .income_per_lot()
                .checked_mul(max_lots)
                .and_then(|income| income_ceiling.checked_add(income))
                .ok_or_else(overflow)?;
            budget_terms.push((lots(i), lot_cost));
        }
        let minimum_spend = minimum_spend(catalog, params)?;

        let mut constraints = Vec::with_capacity(2 * n + 2);
        constraints.push(Constraint::leq(
            ConstraintGroup::Budget,
            budget_terms,
            params.initial_funds(),
        ));

        constraints.push(Constraint::geq(
            ConstraintGroup::Diversification,
            (0..n).map(|i| (held(i), Decimal::ONE)).collect(),
            Decimal::from(params.min_instruments()),
        ));

        for i in 0..n {
            constraints.push(Constraint::leq(
                ConstraintGroup::HeldUpperLink,
                vec![(lots(i), Decimal::ONE), (held(i), -max_lots)],
                Decimal::ZERO,
            ));
        }
        for i in 0..n {
            constraints.push(Constraint::geq(
                ConstraintGroup::HeldLowerLink,
                vec![(lots(i), Decimal::ONE), (held(i), -Decimal::ONE)],
                Decimal::ZERO,
            ));
        }

        debug!(
            catalog = catalog.label(),
            variables = objective.len(),
            constraints = constraints.len(),
            "Built allocation model"
        );

        Ok(ProblemInstance {
            catalog: catalog.clone(),
            params: params.clone(),
            objective,
            bounds,
            kinds,
            constraints,
            minimum_spend,
        })
    }
}

fn minimum_spend(catalog: &Catalog, params: &ParameterSet) -> Result<Price, DomainError> {
    let mut lot_prices: Vec<Price> = catalog
        .instruments()
        .iter()
        .map(|instrument| instrument.price_per_lot())
        .collect();
    lot_prices.sort();
    // bounded by the cost ceiling checked in `build`
    let floor: Price = lot_prices
        .into_iter()
        .take(params.min_instruments())
        .sum();
    gross_up(floor, params.tax_rate()).ok_or_else(|| DomainError::AmountOverflow {
        name: catalog.label().to_string(),
    })
}
