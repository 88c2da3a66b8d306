//! Canonical test configurations.

use rust_decimal::Decimal;

use crate::infrastructure::config::Config;

/// Config with every run parameter set, so nothing is prompted.
pub fn complete(funds: Decimal, min_instruments: usize, max_lots: u32) -> Config {
    let mut config = Config::default();
    config.allocation.initial_funds = Some(funds);
    config.allocation.min_instruments = Some(min_instruments);
    config.allocation.max_lots_per_instrument = Some(max_lots);
    config
}

/// TOML for [`complete`], for tests that go through a file.
pub fn complete_toml(funds: &str, min_instruments: usize, max_lots: u32) -> String {
    format!(
        "[allocation]\ninitial_funds = {funds}\nmin_instruments = {min_instruments}\nmax_lots_per_instrument = {max_lots}\n"
    )
}
