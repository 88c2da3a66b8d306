mod support;

use std::fs;
use std::time::Duration;

use divvy::adapter::catalog::YieldUnit;
use divvy::error::{ConfigError, Error};
use divvy::infrastructure::bootstrap;
use divvy::infrastructure::config::Config;
use divvy::port::CancelFlag;
use divvy::testkit::config::complete_toml;
use rust_decimal_macros::dec;

use support::fixtures::write_temp_config;

#[test]
fn config_loads_complete_allocation_section() {
    let path = write_temp_config(&complete_toml("25000", 3, 5));
    let config = Config::load(&path).unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(config.allocation.initial_funds, Some(dec!(25000)));
    assert_eq!(config.allocation.min_instruments, Some(3));
    assert_eq!(config.allocation.max_lots_per_instrument, Some(5));
    assert_eq!(config.allocation.tax_rate, dec!(0.10));
}

#[test]
fn config_rejects_negative_funds() {
    let path = write_temp_config("[allocation]\ninitial_funds = -5\n");
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue {
            field: "initial_funds",
            ..
        }))
    ));
}

#[test]
fn config_rejects_negative_tax_rate() {
    let path = write_temp_config("[allocation]\ntax_rate = -0.1\n");
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue {
            field: "tax_rate",
            ..
        }))
    ));
}

#[test]
fn config_rejects_integrality_tolerance_out_of_range() {
    let path = write_temp_config("[solver]\nintegrality_tolerance = 0.5\n");
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue {
            field: "integrality_tolerance",
            ..
        }))
    ));
}

#[test]
fn config_rejects_blank_column_name() {
    let path = write_temp_config("[catalog]\nprice_column = \"  \"\n");
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::MissingField {
            field: "price_column"
        }))
    ));
}

#[test]
fn config_rejects_unknown_yield_unit() {
    let path = write_temp_config("[catalog]\nyield_unit = \"basis_points\"\n");
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let config = Config::load_or_default("/nonexistent/divvy.toml").unwrap();
    assert!(config.allocation.initial_funds.is_none());
    assert_eq!(config.catalog.format.yield_unit, YieldUnit::Percent);
}

#[test]
fn bootstrap_wires_solver_settings() {
    let path = write_temp_config(
        "[solver]\ntime_limit_secs = 1.5\nthreads = 2\nbudget_tolerance = 0.01\n\n[catalog]\nyield_unit = \"fraction\"\n",
    );
    let config = Config::load(&path).unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(config.solver.time_limit(), Some(Duration::from_millis(1500)));
    assert_eq!(config.solver.tolerance().budget, dec!(0.01));
    assert_eq!(bootstrap::build_solver(&config).name(), "highs");
    assert_eq!(
        bootstrap::build_catalog_loader(&config).format().yield_unit,
        YieldUnit::Fraction
    );

    let orchestrator = bootstrap::build_orchestrator(&config, CancelFlag::new());
    assert!(format!("{orchestrator:?}").contains("highs"));
}
