//! Allocation domain: instruments, parameters, the MILP formulation and
//! report extraction. Everything here is pure and solver-agnostic.

mod assignment;
mod extract;
mod instrument;
mod money;
mod params;
mod problem;
mod report;

pub mod constraint;
pub mod error;

pub use assignment::Assignment;
pub use constraint::{Constraint, ConstraintGroup, ConstraintSense, VariableBounds};
pub use extract::{extract, Tolerance};
pub use instrument::{Catalog, Instrument};
pub use money::{gross_up, Price, Rate};
pub use params::{ParameterSet, DEFAULT_TAX_RATE};
pub use problem::{ProblemBuilder, ProblemInstance, VariableKind};
pub use report::{AllocationReport, AllocationRow, ReportStatus};
