//! Linear constraint types for the allocation model.
//!
//! Constraints are sparse: each lists only the variables it touches. Every
//! constraint carries the [`ConstraintGroup`] it was emitted for, so a built
//! problem can be audited group by group.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single linear constraint: `sum(coeff * x[index]) {>=, <=, =} rhs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constraint {
    /// Which invariant this constraint encodes.
    pub group: ConstraintGroup,
    /// `(variable index, coefficient)` pairs; absent variables have coefficient 0.
    pub terms: Vec<(usize, Decimal)>,
    /// Constraint sense (>=, <=, =).
    pub sense: ConstraintSense,
    /// Right-hand side value.
    pub rhs: Decimal,
}

impl Constraint {
    /// Create a >= constraint.
    #[must_use]
    pub const fn geq(group: ConstraintGroup, terms: Vec<(usize, Decimal)>, rhs: Decimal) -> Self {
        Self {
            group,
            terms,
            sense: ConstraintSense::GreaterEqual,
            rhs,
        }
    }

    /// Create a <= constraint.
    #[must_use]
    pub const fn leq(group: ConstraintGroup, terms: Vec<(usize, Decimal)>, rhs: Decimal) -> Self {
        Self {
            group,
            terms,
            sense: ConstraintSense::LessEqual,
            rhs,
        }
    }

    /// Left-hand side evaluated at `values`.
    #[must_use]
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(index, coeff)| {
                let value = values.get(*index).copied().unwrap_or(0.0);
                decimal_to_f64(*coeff) * value
            })
            .sum()
    }

    /// Whether `values` satisfy this constraint within `tolerance`.
    #[must_use]
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.activity(values);
        let rhs = decimal_to_f64(self.rhs);
        match self.sense {
            ConstraintSense::GreaterEqual => lhs >= rhs - tolerance,
            ConstraintSense::LessEqual => lhs <= rhs + tolerance,
            ConstraintSense::Equal => (lhs - rhs).abs() <= tolerance,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            write!(f, "0")?;
        }
        for (position, (index, coeff)) in self.terms.iter().enumerate() {
            let sign = if coeff.is_sign_negative() { "-" } else { "+" };
            if position == 0 {
                if coeff.is_sign_negative() {
                    write!(f, "-")?;
                }
            } else {
                write!(f, " {sign} ")?;
            }
            write!(f, "{}·x{index}", coeff.abs().normalize())?;
        }
        write!(f, " {} {}", self.sense, self.rhs.normalize())
    }
}

/// Constraint sense (comparison operator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintSense {
    /// Greater than or equal (>=).
    GreaterEqual,
    /// Less than or equal (<=).
    LessEqual,
    /// Equal (=).
    Equal,
}

impl fmt::Display for ConstraintSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::GreaterEqual => ">=",
            Self::LessEqual => "<=",
            Self::Equal => "=",
        };
        f.write_str(symbol)
    }
}

/// The invariant a constraint was emitted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintGroup {
    /// Grossed-up spend stays within initial funds.
    Budget,
    /// At least `min_instruments` held indicators are set.
    Diversification,
    /// `lots[i] <= max_lots * held[i]`: lots require the held flag.
    HeldUpperLink,
    /// `lots[i] >= held[i]`: a held instrument carries at least one lot.
    HeldLowerLink,
}

impl fmt::Display for ConstraintGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Budget => "budget",
            Self::Diversification => "diversification",
            Self::HeldUpperLink => "held-upper-link",
            Self::HeldLowerLink => "held-lower-link",
        };
        f.write_str(label)
    }
}

/// Bounds on a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariableBounds {
    /// Lower bound (None = -infinity).
    pub lower: Option<Decimal>,
    /// Upper bound (None = +infinity).
    pub upper: Option<Decimal>,
}

impl Default for VariableBounds {
    fn default() -> Self {
        Self {
            lower: Some(Decimal::ZERO),
            upper: None,
        }
    }
}

impl VariableBounds {
    /// Binary variable bounds [0, 1].
    #[must_use]
    pub const fn binary() -> Self {
        Self {
            lower: Some(Decimal::ZERO),
            upper: Some(Decimal::ONE),
        }
    }

    /// Bounded variable [lower, upper].
    #[must_use]
    pub const fn bounded(lower: Decimal, upper: Decimal) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// Whether `value` lies inside the bounds within `tolerance`.
    #[must_use]
    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        let above = self
            .lower
            .map_or(true, |lb| value >= decimal_to_f64(lb) - tolerance);
        let below = self
            .upper
            .map_or(true, |ub| value <= decimal_to_f64(ub) + tolerance);
        above && below
    }
}

/// Lossy conversion used only at the floating-point solver boundary.
#[must_use]
pub fn decimal_to_f64(value: Decimal) -> f64 {
    use rust_decimal::prelude::ToPrimitive;
    value.to_f64().unwrap_or(0.0)
}
