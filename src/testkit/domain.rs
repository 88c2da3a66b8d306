//! Builders for domain primitives used across tests.
//!
//! Prices and yields are given as plain `&str` decimals so fixtures read
//! like catalog rows. Yields are fractions (`"0.05"` is 5%).

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::{Catalog, Instrument, ParameterSet, DEFAULT_TAX_RATE};

fn decimal(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_else(|_| panic!("bad decimal fixture: {value}"))
}

/// Create an [`Instrument`] from a name, lot price and fractional yield.
pub fn instrument(name: &str, price: &str, dividend_yield: &str) -> Instrument {
    Instrument::try_new(name, decimal(price), decimal(dividend_yield))
        .unwrap_or_else(|e| panic!("bad instrument fixture {name}: {e}"))
}

/// Create a [`Catalog`] from `(name, price, yield)` rows.
pub fn catalog(label: &str, rows: &[(&str, &str, &str)]) -> Catalog {
    let instruments = rows
        .iter()
        .map(|(name, price, dividend_yield)| instrument(name, price, dividend_yield))
        .collect();
    Catalog::try_new(label, instruments)
        .unwrap_or_else(|e| panic!("bad catalog fixture {label}: {e}"))
}

/// The two-instrument catalog used throughout the docs:
/// A at 100 yielding 5%, B at 200 yielding 8%.
pub fn two_instrument_catalog() -> Catalog {
    catalog("pair", &[("A", "100", "0.05"), ("B", "200", "0.08")])
}

/// Five instruments with varied prices and yields, small enough to
/// enumerate exhaustively at low lot limits.
pub fn mixed_catalog() -> Catalog {
    catalog(
        "mixed",
        &[
            ("Maybank", "930", "0.062"),
            ("Tenaga", "1304", "0.041"),
            ("Public Bank", "432", "0.048"),
            ("CIMB", "760", "0.055"),
            ("Sime", "245", "0.036"),
        ],
    )
}

/// Parameter set with the default 10% tax.
pub fn params(funds: &str, min_instruments: usize, max_lots: u32) -> ParameterSet {
    ParameterSet::try_new(decimal(funds), min_instruments, max_lots, DEFAULT_TAX_RATE)
        .unwrap_or_else(|e| panic!("bad parameter fixture: {e}"))
}
