//! Handler for the `allocate` command.

use std::path::PathBuf;

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::json;
use tabled::{Table, Tabled};
use tracing::info;
use uuid::Uuid;

use crate::adapter::inbound::cli::command::AllocateArgs;
use crate::adapter::inbound::cli::{output, prompt};
use crate::application::{CatalogResult, Orchestrator};
use crate::domain::{AllocationReport, Catalog, ParameterSet, ReportStatus};
use crate::error::{CatalogError, ConfigError, Error, Result};
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;
use crate::port::CancelFlag;

#[derive(Tabled)]
struct AllocationTableRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Lots")]
    lots: u32,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Annual Return")]
    annual_return: String,
}

/// Outcome for one catalog path, including catalogs that failed to load.
enum CatalogEntry {
    Solved(CatalogResult),
    LoadFailed { label: String, error: CatalogError },
}

impl CatalogEntry {
    fn is_ok(&self) -> bool {
        matches!(self, Self::Solved(result) if result.is_ok())
    }
}

/// Execute the allocate command.
pub async fn execute(args: &AllocateArgs) -> Result<()> {
    let mut config = Config::load_or_default(&args.config)?;
    apply_overrides(&mut config, args);
    config.validate()?;
    config.init_logging();

    let paths = catalog_paths(args, &config)?;
    let params = prompt::resolve(&args.params, &config.allocation)?;

    let run_id = Uuid::new_v4();
    info!(%run_id, catalogs = paths.len(), "Starting allocation run");
    if output::verbosity() > 0 {
        output::field("Run id", run_id);
        output::field("Catalogs", paths.len());
    }

    let loader = bootstrap::build_catalog_loader(&config);
    let mut catalogs = Vec::new();
    let mut load_failures = Vec::with_capacity(paths.len());
    for path in &paths {
        match loader.load(path) {
            Ok(catalog) => {
                catalogs.push(catalog);
                load_failures.push(None);
            }
            Err(error) => load_failures.push(Some((path.display().to_string(), error))),
        }
    }

    let cancel = CancelFlag::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let orchestrator = bootstrap::build_orchestrator(&config, cancel);
    let spinner = output::spinner(&format!("Solving {} catalog(s)", catalogs.len()));
    let solved = solve(&orchestrator, catalogs, &params, config.run.concurrency).await;
    interrupt.abort();

    let solved = match solved {
        Ok(results) => {
            output::spinner_success(&spinner, "Solved");
            results
        }
        Err(err) => {
            output::spinner_fail(&spinner, "Solve failed");
            return Err(err);
        }
    };

    let mut solved = solved.into_iter();
    let entries: Vec<CatalogEntry> = load_failures
        .into_iter()
        .filter_map(|failure| match failure {
            None => solved.next().map(CatalogEntry::Solved),
            Some((label, error)) => Some(CatalogEntry::LoadFailed { label, error }),
        })
        .collect();

    if output::is_json() {
        render_json(run_id, &params, &entries)?;
    } else {
        for entry in &entries {
            render_entry(entry);
        }
    }

    let failed = entries.iter().filter(|entry| !entry.is_ok()).count();
    if failed > 0 {
        return Err(Error::CatalogsFailed {
            failed,
            total: entries.len(),
        });
    }
    Ok(())
}

async fn solve(
    orchestrator: &Orchestrator,
    catalogs: Vec<Catalog>,
    params: &ParameterSet,
    concurrency: usize,
) -> Result<Vec<CatalogResult>> {
    if concurrency > 1 {
        return Ok(orchestrator
            .run_concurrent(catalogs, params, concurrency)
            .await);
    }

    let orchestrator = orchestrator.clone();
    let params = params.clone();
    let results =
        tokio::task::spawn_blocking(move || orchestrator.run(&catalogs, &params)).await?;
    Ok(results)
}

/// Apply command-line overrides that live outside `[allocation]`.
fn apply_overrides(config: &mut Config, args: &AllocateArgs) {
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
    if let Some(unit) = args.params.yield_unit {
        config.catalog.format.yield_unit = unit;
    }
    if let Some(secs) = args.time_limit {
        config.solver.time_limit_secs = Some(secs);
    }
    if let Some(concurrency) = args.concurrency {
        config.run.concurrency = concurrency;
    }
}

fn catalog_paths(args: &AllocateArgs, config: &Config) -> Result<Vec<PathBuf>> {
    let paths = if args.catalogs.is_empty() {
        config.catalog.paths.clone()
    } else {
        args.catalogs.clone()
    };
    if paths.is_empty() {
        return Err(ConfigError::MissingField {
            field: "catalog.paths",
        }
        .into());
    }
    Ok(paths)
}

/// Format a currency amount to two decimal places, halves away from zero.
pub(crate) fn money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

fn render_entry(entry: &CatalogEntry) {
    match entry {
        CatalogEntry::Solved(result) => {
            output::heading(&format!("Results for {}", result.catalog));
            match &result.outcome {
                Ok(report) => render_report(report),
                Err(err) => output::error(&format!("{} ({})", err, err.kind())),
            }
        }
        CatalogEntry::LoadFailed { label, error } => {
            output::heading(&format!("Results for {label}"));
            output::error(&format!("{error} (invalid_input)"));
        }
    }
}

fn render_report(report: &AllocationReport) {
    if report.status == ReportStatus::Infeasible {
        output::warning("No allocation satisfies the budget and diversification constraints");
        if let Some(spend) = report.minimum_spend {
            output::field("Minimum spend", money(spend));
        }
        if let Some(shortfall) = report.shortfall() {
            output::field("Shortfall", output::negative(money(shortfall)));
        }
        output::hint("lower --min-instruments or raise --funds");
        return;
    }

    if report.rows.is_empty() {
        output::note("Nothing to buy with these funds");
    } else {
        let rows: Vec<AllocationTableRow> = report
            .rows
            .iter()
            .map(|row| AllocationTableRow {
                name: row.name.clone(),
                lots: row.lots,
                cost: money(row.cost),
                annual_return: money(row.annual_return),
            })
            .collect();
        output::lines(&Table::new(rows).to_string());
    }

    output::lines(&format!(
        "Total annual return: {}\nTotal cost: {}\nLeftover funds: {}",
        output::positive(money(report.total_return)),
        money(report.total_cost),
        money(report.leftover_funds),
    ));

    if report.status == ReportStatus::OptimalityUnknown {
        output::warning("Time limit reached; this allocation may not be optimal");
    }
}

fn render_json(run_id: Uuid, params: &ParameterSet, entries: &[CatalogEntry]) -> Result<()> {
    let catalogs = entries
        .iter()
        .map(|entry| match entry {
            CatalogEntry::Solved(result) => serde_json::to_value(result),
            CatalogEntry::LoadFailed { label, error } => Ok(json!({
                "catalog": label,
                "outcome": {
                    "error": { "kind": "invalid_input", "message": error.to_string() },
                },
            })),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    output::json_output(json!({
        "run_id": run_id,
        "generated_at": Utc::now(),
        "parameters": serde_json::to_value(params)?,
        "catalogs": catalogs,
    }));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::inbound::cli::command::{Cli, Commands};
    use clap::Parser;
    use rust_decimal_macros::dec;

    fn allocate_args(argv: &[&str]) -> AllocateArgs {
        let mut full = vec!["divvy", "allocate"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Allocate(args) => args,
            _ => panic!("expected allocate"),
        }
    }

    #[test]
    fn test_money_rounds_half_away_from_zero() {
        assert_eq!(money(dec!(990)), "990.00");
        assert_eq!(money(dec!(12.345)), "12.35");
        assert_eq!(money(dec!(12.344)), "12.34");
        assert_eq!(money(dec!(0.005)), "0.01");
    }

    #[test]
    fn test_cli_catalogs_win_over_config_paths() {
        let args = allocate_args(&["a.csv"]);
        let mut config = Config::default();
        config.catalog.paths = vec![PathBuf::from("b.csv"), PathBuf::from("c.csv")];

        let paths = catalog_paths(&args, &config).unwrap();
        assert_eq!(paths, vec![PathBuf::from("a.csv")]);
    }

    #[test]
    fn test_missing_catalogs_is_config_error() {
        let args = allocate_args(&[]);
        let result = catalog_paths(&args, &Config::default());
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField {
                field: "catalog.paths"
            }))
        ));
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let args = allocate_args(&[
            "--time-limit",
            "3",
            "--concurrency",
            "4",
            "--log-level",
            "debug",
            "--json-logs",
        ]);
        let mut config = Config::default();
        apply_overrides(&mut config, &args);

        assert_eq!(config.solver.time_limit_secs, Some(3.0));
        assert_eq!(config.run.concurrency, 4);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_huge_time_limit_override_fails_validation() {
        let args = allocate_args(&["--time-limit", "1e300"]);
        let mut config = Config::default();
        apply_overrides(&mut config, &args);
        assert!(matches!(
            config.validate(),
            Err(Error::Config(ConfigError::InvalidValue {
                field: "time_limit_secs",
                ..
            }))
        ));
    }

    #[test]
    fn test_zero_concurrency_override_fails_validation() {
        let args = allocate_args(&["--concurrency", "0"]);
        let mut config = Config::default();
        apply_overrides(&mut config, &args);
        assert!(config.validate().is_err());
    }
}
