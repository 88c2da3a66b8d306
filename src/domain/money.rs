//! Monetary types for price and rate representation.

use rust_decimal::Decimal;

/// Currency amount represented as a Decimal for precision.
pub type Price = Decimal;

/// Fractional rate (yield, tax) represented as a Decimal: `0.10` is 10%.
pub type Rate = Decimal;

/// Gross a pre-tax amount up by a tax rate: `amount * (1 + tax_rate)`.
///
/// `None` when the result does not fit a `Decimal`.
#[must_use]
pub fn gross_up(amount: Price, tax_rate: Rate) -> Option<Price> {
    Decimal::ONE
        .checked_add(tax_rate)
        .and_then(|factor| amount.checked_mul(factor))
}
