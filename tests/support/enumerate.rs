//! Exhaustive reference optimum for small catalogs.

use rust_decimal::Decimal;

use divvy::domain::{Catalog, ParameterSet};

/// Best total return over every lot vector in `[0, max_lots]^n`, or `None`
/// when no vector meets the budget and diversification constraints.
pub fn best_return(catalog: &Catalog, params: &ParameterSet) -> Option<Decimal> {
    let instruments = catalog.instruments();
    let gross = Decimal::ONE + params.tax_rate();
    let mut lots = vec![0u32; instruments.len()];
    let mut best: Option<Decimal> = None;

    loop {
        let held = lots.iter().filter(|&&l| l > 0).count();
        let cost: Decimal = instruments
            .iter()
            .zip(&lots)
            .map(|(i, &l)| Decimal::from(l) * i.price_per_lot() * gross)
            .sum();
        if held >= params.min_instruments() && cost <= params.initial_funds() {
            let income: Decimal = instruments
                .iter()
                .zip(&lots)
                .map(|(i, &l)| Decimal::from(l) * i.income_per_lot())
                .sum();
            best = Some(best.map_or(income, |b| b.max(income)));
        }

        // odometer increment
        let mut digit = 0;
        loop {
            if digit == lots.len() {
                return best;
            }
            if lots[digit] < params.max_lots() {
                lots[digit] += 1;
                break;
            }
            lots[digit] = 0;
            digit += 1;
        }
    }
}
