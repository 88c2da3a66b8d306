//! Domain validation errors for instruments, catalogs and run parameters.
//!
//! These errors are returned by `try_new` constructors and by the problem
//! builder. Every variant means the input itself is unusable, so callers
//! treat them as invalid input for the catalog in question.
//!
//! # Examples
//!
//! ```
//! use divvy::domain::error::DomainError;
//! use divvy::domain::Instrument;
//! use rust_decimal_macros::dec;
//!
//! let result = Instrument::try_new("MAYBANK", dec!(0), dec!(0.06));
//! assert!(matches!(result, Err(DomainError::NonPositivePrice { .. })));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A catalog must contain at least one instrument.
    #[error("catalog '{catalog}' contains no instruments")]
    EmptyCatalog {
        /// Label of the offending catalog.
        catalog: String,
    },

    /// Instrument names identify rows within a catalog.
    #[error("instrument '{name}' appears more than once in catalog '{catalog}'")]
    DuplicateInstrument {
        /// Label of the offending catalog.
        catalog: String,
        /// The repeated instrument name.
        name: String,
    },

    /// Instrument names cannot be blank.
    #[error("instrument name cannot be empty")]
    EmptyName,

    /// Lots must cost something.
    #[error("price per lot for '{name}' must be positive, got {price}")]
    NonPositivePrice {
        /// Instrument name.
        name: String,
        /// The invalid price.
        price: Decimal,
    },

    /// Dividend yields cannot be negative.
    #[error("dividend yield for '{name}' cannot be negative, got {dividend_yield}")]
    NegativeYield {
        /// Instrument name.
        name: String,
        /// The invalid yield.
        dividend_yield: Decimal,
    },

    /// Costs or income derived from an instrument do not fit a `Decimal`.
    #[error("amounts for '{name}' exceed the representable range")]
    AmountOverflow {
        /// Instrument name, or catalog label for catalog-wide totals.
        name: String,
    },

    /// A run parameter is outside its valid range.
    #[error("invalid value for {field}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// More distinct instruments were required than the catalog offers.
    #[error("minimum of {required} instruments exceeds the {available} in catalog '{catalog}'")]
    DiversificationExceedsCatalog {
        /// Label of the offending catalog.
        catalog: String,
        /// Requested minimum distinct instruments.
        required: usize,
        /// Instruments available in the catalog.
        available: usize,
    },
}
