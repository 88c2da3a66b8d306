use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures loading an instrument catalog from its source.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("catalog {} has no '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("catalog {} line {line}: {reason}", path.display())]
    MalformedRow {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// The solver could not produce a definitive answer.
///
/// Distinct from infeasibility: these mean "no answer", not "no solution".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("solver timed out after {limit:?}")]
    Timeout { limit: Duration },

    #[error("solve cancelled before it started")]
    Cancelled,

    #[error("model reported unbounded")]
    Unbounded,

    #[error("solver backend failed: {0}")]
    Backend(String),

    #[error("solver returned an invalid assignment: {reason}")]
    InvalidAssignment { reason: String },
}

/// Why a single catalog produced no report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] DomainError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("invariant violated: {reason}")]
    InvariantViolation { reason: String },
}

impl AllocationError {
    /// Stable machine-readable kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Solver(_) => "solver_error",
            Self::InvariantViolation { .. } => "invariant_violation",
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("background task failed: {0}")]
    Task(String),

    #[error("{failed} of {total} catalogs failed")]
    CatalogsFailed { failed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Task(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_error_kinds() {
        let invalid = AllocationError::from(DomainError::EmptyName);
        assert_eq!(invalid.kind(), "invalid_input");

        let solver = AllocationError::from(SolverError::Unbounded);
        assert_eq!(solver.kind(), "solver_error");

        let invariant = AllocationError::InvariantViolation {
            reason: "negative leftover".into(),
        };
        assert_eq!(invariant.kind(), "invariant_violation");
    }

    #[test]
    fn test_catalogs_failed_message() {
        let err = Error::CatalogsFailed {
            failed: 1,
            total: 2,
        };
        assert_eq!(err.to_string(), "1 of 2 catalogs failed");
    }

    #[test]
    fn test_timeout_is_not_infeasibility() {
        let err = SolverError::Timeout {
            limit: Duration::from_secs(5),
        };
        assert!(err.to_string().contains("timed out"));
    }
}
