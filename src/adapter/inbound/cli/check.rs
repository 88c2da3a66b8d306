//! Handler for `divvy check config`.

use std::path::Path;

use serde_json::{json, Value};

use crate::adapter::catalog::YieldUnit;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Validate a configuration file without running an allocation.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    let config = Config::load(path)?;

    if output::is_json() {
        output::json_output(check_document(path, &config));
        return Ok(());
    }

    output::section("Configuration Check");
    output::field("Config", path.display());
    output::success("Configuration file is valid");

    output::section("Allocation");
    let allocation = &config.allocation;
    output::field("Funds", describe(allocation.initial_funds));
    output::field("Min instruments", describe(allocation.min_instruments));
    output::field("Max lots", describe(allocation.max_lots_per_instrument));
    output::field("Tax rate", allocation.tax_rate);

    output::section("Catalogs");
    if config.catalog.paths.is_empty() {
        output::field("Paths", "none (pass catalogs on the command line)");
    }
    for catalog in &config.catalog.paths {
        if catalog.exists() {
            output::field("Path", catalog.display());
        } else {
            output::warning(&format!("Catalog not found: {}", catalog.display()));
        }
    }
    output::field(
        "Yield unit",
        match config.catalog.format.yield_unit {
            YieldUnit::Percent => "percent",
            YieldUnit::Fraction => "fraction",
        },
    );

    output::section("Solver");
    output::field(
        "Time limit",
        config
            .solver
            .time_limit_secs
            .map_or_else(|| "none".to_string(), |secs| format!("{secs}s")),
    );
    output::field(
        "Threads",
        config
            .solver
            .threads
            .map_or_else(|| format!("auto ({})", num_cpus::get()), |t| t.to_string()),
    );
    output::field("Concurrency", config.run.concurrency);

    let unset = [
        allocation.initial_funds.is_none(),
        allocation.min_instruments.is_none(),
        allocation.max_lots_per_instrument.is_none(),
    ]
    .into_iter()
    .filter(|missing| *missing)
    .count();
    if unset > 0 {
        output::hint("unset parameters are prompted for, or pass them as flags");
    }

    output::success("Configuration check complete");
    Ok(())
}

/// The `--json` form of a successful check.
fn check_document(path: &Path, config: &Config) -> Value {
    let allocation = &config.allocation;
    let missing: Vec<String> = config
        .catalog
        .paths
        .iter()
        .filter(|catalog| !catalog.exists())
        .map(|catalog| catalog.display().to_string())
        .collect();
    json!({
        "config": path.display().to_string(),
        "valid": true,
        "allocation": {
            "initial_funds": allocation.initial_funds,
            "min_instruments": allocation.min_instruments,
            "max_lots_per_instrument": allocation.max_lots_per_instrument,
            "tax_rate": allocation.tax_rate,
        },
        "catalog": {
            "paths": config.catalog.paths,
            "missing": missing,
            "yield_unit": config.catalog.format.yield_unit,
        },
        "solver": {
            "time_limit_secs": config.solver.time_limit_secs,
            "threads": config.solver.threads,
        },
        "run": { "concurrency": config.run.concurrency },
    })
}

fn describe<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| output::muted("prompt"), |v| v.to_string())
}
