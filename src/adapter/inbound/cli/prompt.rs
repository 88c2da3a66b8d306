//! Collection of run parameters from flags, config and prompts.
//!
//! Flags win over the `[allocation]` config section; whatever is still
//! missing is asked for on the terminal, or reported as a missing field when
//! prompting is not possible.

use std::io::IsTerminal;

use dialoguer::{theme::ColorfulTheme, Input};
use rust_decimal::Decimal;

use crate::adapter::inbound::cli::command::ParameterArgs;
use crate::adapter::inbound::cli::output;
use crate::domain::ParameterSet;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::allocation::AllocationConfig;

/// Run parameters after flags are layered over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialParameters {
    pub initial_funds: Option<Decimal>,
    pub min_instruments: Option<usize>,
    pub max_lots: Option<u32>,
    pub tax_rate: Decimal,
}

impl PartialParameters {
    /// Layer command-line flags over the config section.
    #[must_use]
    pub fn merge(args: &ParameterArgs, config: &AllocationConfig) -> Self {
        Self {
            initial_funds: args.funds.or(config.initial_funds),
            min_instruments: args.min_instruments.or(config.min_instruments),
            max_lots: args.max_lots.or(config.max_lots_per_instrument),
            tax_rate: args.tax_rate.unwrap_or(config.tax_rate),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.initial_funds.is_some() && self.min_instruments.is_some() && self.max_lots.is_some()
    }

    /// Build the parameter set without prompting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] for the first absent value and
    /// a domain error if a value is out of range.
    pub fn into_parameters(self) -> Result<ParameterSet> {
        let initial_funds = self.initial_funds.ok_or(ConfigError::MissingField {
            field: "initial_funds",
        })?;
        let min_instruments = self.min_instruments.ok_or(ConfigError::MissingField {
            field: "min_instruments",
        })?;
        let max_lots = self.max_lots.ok_or(ConfigError::MissingField {
            field: "max_lots_per_instrument",
        })?;
        Ok(ParameterSet::try_new(
            initial_funds,
            min_instruments,
            max_lots,
            self.tax_rate,
        )?)
    }
}

/// Whether missing parameters may be asked for on the terminal.
#[must_use]
pub fn can_prompt(args: &ParameterArgs) -> bool {
    !args.no_input && !output::is_json() && std::io::stdin().is_terminal()
}

/// Resolve the run parameters, prompting for gaps when allowed.
///
/// # Errors
///
/// Returns an error if a value is missing and prompting is disabled, the
/// prompt fails, or a value is out of range.
pub fn resolve(args: &ParameterArgs, config: &AllocationConfig) -> Result<ParameterSet> {
    let mut partial = PartialParameters::merge(args, config);
    if partial.is_complete() || !can_prompt(args) {
        return partial.into_parameters();
    }

    let theme = ColorfulTheme::default();
    output::section("Parameters");

    if partial.initial_funds.is_none() {
        let funds: Decimal = Input::with_theme(&theme)
            .with_prompt("Initial investment funds")
            .validate_with(|value: &Decimal| {
                if value.is_sign_negative() {
                    Err("must be 0 or greater")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;
        partial.initial_funds = Some(funds);
    }
    if partial.min_instruments.is_none() {
        let min: usize = Input::with_theme(&theme)
            .with_prompt("Minimum number of stocks to hold")
            .interact_text()?;
        partial.min_instruments = Some(min);
    }
    if partial.max_lots.is_none() {
        let max: u32 = Input::with_theme(&theme)
            .with_prompt("Maximum lots per stock")
            .validate_with(|value: &u32| {
                if *value == 0 {
                    Err("must be at least 1")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;
        partial.max_lots = Some(max);
    }

    partial.into_parameters()
}
