//! Run-wide allocation parameters.
//!
//! # Tax convention
//!
//! `tax_rate` is a purchase tax charged on acquisition cost only. One lot of
//! an instrument costs `price_per_lot * (1 + tax_rate)`; this grossed-up cost
//! is what the budget constraint bounds, and it is exactly the cost reported
//! per row and in total. Dividend income is never tax-adjusted.

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::DomainError;
use super::money::{gross_up, Price, Rate};

/// Tax rate applied when none is configured (10%).
pub const DEFAULT_TAX_RATE: Rate = Decimal::from_parts(10, 0, 0, false, 2);

/// Validated parameters shared by every catalog in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSet {
    initial_funds: Price,
    min_instruments: usize,
    max_lots: u32,
    tax_rate: Rate,
}

impl ParameterSet {
    /// Create a validated parameter set.
    ///
    /// Whether `min_instruments` fits a particular catalog is checked by the
    /// problem builder, since parameters are shared across catalogs.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidParameter`] if funds or tax rate are
    /// negative, or `max_lots` is zero.
    pub fn try_new(
        initial_funds: Price,
        min_instruments: usize,
        max_lots: u32,
        tax_rate: Rate,
    ) -> Result<Self, DomainError> {
        if initial_funds < Decimal::ZERO {
            return Err(DomainError::InvalidParameter {
                field: "initial_funds",
                reason: format!("must be 0 or greater, got {initial_funds}"),
            });
        }
        if max_lots < 1 {
            return Err(DomainError::InvalidParameter {
                field: "max_lots_per_instrument",
                reason: "must be at least 1".to_string(),
            });
        }
        if tax_rate < Decimal::ZERO {
            return Err(DomainError::InvalidParameter {
                field: "tax_rate",
                reason: format!("must be 0 or greater, got {tax_rate}"),
            });
        }
        Ok(Self {
            initial_funds,
            min_instruments,
            max_lots,
            tax_rate,
        })
    }

    #[must_use]
    pub const fn initial_funds(&self) -> Price {
        self.initial_funds
    }

    #[must_use]
    pub const fn min_instruments(&self) -> usize {
        self.min_instruments
    }

    #[must_use]
    pub const fn max_lots(&self) -> u32 {
        self.max_lots
    }

    #[must_use]
    pub const fn tax_rate(&self) -> Rate {
        self.tax_rate
    }

    /// Grossed-up cost of `lots` lots at `price_per_lot`, or `None` on
    /// overflow.
    #[must_use]
    pub fn lot_cost(&self, price_per_lot: Price, lots: u32) -> Option<Price> {
        price_per_lot
            .checked_mul(Decimal::from(lots))
            .and_then(|amount| gross_up(amount, self.tax_rate))
    }

    /// Return a copy with different funds, keeping every other field.
    ///
    /// # Errors
    ///
    /// Same as [`ParameterSet::try_new`].
    pub fn with_initial_funds(&self, initial_funds: Price) -> Result<Self, DomainError> {
        Self::try_new(initial_funds, self.min_instruments, self.max_lots, self.tax_rate)
    }

    /// Return a copy with a different diversification floor.
    ///
    /// # Errors
    ///
    /// Same as [`ParameterSet::try_new`].
    pub fn with_min_instruments(&self, min_instruments: usize) -> Result<Self, DomainError> {
        Self::try_new(self.initial_funds, min_instruments, self.max_lots, self.tax_rate)
    }
}
