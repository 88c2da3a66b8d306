//! Candidate instruments and the catalogs that group them.
//!
//! An [`Instrument`] is validated once, at construction, so every value that
//! reaches the problem builder already has a positive lot price and a
//! non-negative yield. A [`Catalog`] adds the collection-level rules: at
//! least one instrument, and unique names.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::DomainError;
use super::money::{Price, Rate};

/// A dividend-paying instrument purchasable in whole lots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instrument {
    name: String,
    price_per_lot: Price,
    dividend_yield: Rate,
}

impl Instrument {
    /// Create a validated instrument.
    ///
    /// `dividend_yield` is an annual fraction (`0.05` for 5%).
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] if the name is blank, the price is not
    /// positive, the yield is negative, or their product overflows.
    pub fn try_new(
        name: impl Into<String>,
        price_per_lot: Price,
        dividend_yield: Rate,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::EmptyName);
        }
        if price_per_lot <= Decimal::ZERO {
            return Err(DomainError::NonPositivePrice {
                name,
                price: price_per_lot,
            });
        }
        if dividend_yield < Decimal::ZERO {
            return Err(DomainError::NegativeYield {
                name,
                dividend_yield,
            });
        }
        if price_per_lot.checked_mul(dividend_yield).is_none() {
            return Err(DomainError::AmountOverflow { name });
        }
        Ok(Self {
            name,
            price_per_lot,
            dividend_yield,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn price_per_lot(&self) -> Price {
        self.price_per_lot
    }

    #[must_use]
    pub const fn dividend_yield(&self) -> Rate {
        self.dividend_yield
    }

    /// Annual dividend income from holding one lot.
    #[must_use]
    pub fn income_per_lot(&self) -> Price {
        self.price_per_lot * self.dividend_yield
    }
}

/// An ordered, validated set of candidate instruments.
///
/// Row order is significant: reports list holdings in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    label: String,
    instruments: Vec<Instrument>,
}

impl Catalog {
    /// Create a catalog from already-validated instruments.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyCatalog`] when `instruments` is empty and
    /// [`DomainError::DuplicateInstrument`] when two rows share a name.
    pub fn try_new(
        label: impl Into<String>,
        instruments: Vec<Instrument>,
    ) -> Result<Self, DomainError> {
        let label = label.into();
        if instruments.is_empty() {
            return Err(DomainError::EmptyCatalog { catalog: label });
        }

        let mut seen = HashSet::with_capacity(instruments.len());
        for instrument in &instruments {
            if !seen.insert(instrument.name()) {
                return Err(DomainError::DuplicateInstrument {
                    catalog: label,
                    name: instrument.name().to_string(),
                });
            }
        }

        Ok(Self { label, instruments })
    }

    /// Human-readable label, usually the source file path.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}
