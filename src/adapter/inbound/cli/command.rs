//! Command-line interface definitions.
//!
//! Defines the CLI structure for divvy using `clap`. Run parameters given
//! here take precedence over the config file, which takes precedence over
//! interactive prompts.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::adapter::catalog::YieldUnit;
use crate::infrastructure::config::DEFAULT_CONFIG_PATH;

/// Dividend portfolio allocation as a mixed-integer program
#[derive(Parser, Debug)]
#[command(name = "divvy")]
#[command(version, about)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Allocate funds across one or more instrument catalogs
    Allocate(AllocateArgs),

    /// Print the optimisation model built for a catalog
    Model(ModelArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `divvy check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration file syntax and semantics.
    Config(ConfigPathArg),
}

/// Shared argument struct for commands that require only a configuration path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

/// Run parameters shared by every catalog.
#[derive(Parser, Debug, Default, Clone)]
pub struct ParameterArgs {
    /// Initial investment funds
    #[arg(long)]
    pub funds: Option<Decimal>,

    /// Minimum number of distinct instruments to hold
    #[arg(long)]
    pub min_instruments: Option<usize>,

    /// Maximum lots to buy of any one instrument
    #[arg(long)]
    pub max_lots: Option<u32>,

    /// Purchase tax rate (0.10 = 10%)
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Unit of the yield column
    #[arg(long, value_enum)]
    pub yield_unit: Option<YieldUnit>,

    /// Fail instead of prompting for missing parameters
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `allocate` subcommand.
#[derive(Parser, Debug)]
pub struct AllocateArgs {
    /// Catalog CSV files; defaults to `catalog.paths` from the config
    pub catalogs: Vec<PathBuf>,

    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(flatten)]
    pub params: ParameterArgs,

    /// Time limit per catalog solve, in seconds
    #[arg(long)]
    pub time_limit: Option<f64>,

    /// Catalogs to solve at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,
}

/// Arguments for the `model` subcommand.
#[derive(Parser, Debug)]
pub struct ModelArgs {
    /// Catalog CSV file
    pub catalog: PathBuf,

    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(flatten)]
    pub params: ParameterArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cli_verifies() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "divvy");
    }

    #[test]
    fn test_parse_allocate_with_parameters() {
        let cli = Cli::try_parse_from([
            "divvy",
            "allocate",
            "owned.csv",
            "watchlist.csv",
            "--funds",
            "10000",
            "--min-instruments",
            "3",
            "--max-lots",
            "5",
            "--tax-rate",
            "0.1",
        ])
        .unwrap();

        let Commands::Allocate(args) = cli.command else {
            panic!("expected allocate");
        };
        assert_eq!(args.catalogs.len(), 2);
        assert_eq!(args.params.funds, Some(dec!(10000)));
        assert_eq!(args.params.min_instruments, Some(3));
        assert_eq!(args.params.max_lots, Some(5));
        assert_eq!(args.params.tax_rate, Some(dec!(0.1)));
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn test_allocate_defaults() {
        let cli = Cli::try_parse_from(["divvy", "allocate"]).unwrap();
        let Commands::Allocate(args) = cli.command else {
            panic!("expected allocate");
        };
        assert!(args.catalogs.is_empty());
        assert!(args.params.funds.is_none());
        assert!(!args.params.no_input);
        assert!(!args.json_logs);
    }

    #[test]
    fn test_parse_yield_unit() {
        let cli = Cli::try_parse_from(["divvy", "model", "a.csv", "--yield-unit", "fraction"])
            .unwrap();
        let Commands::Model(args) = cli.command else {
            panic!("expected model");
        };
        assert_eq!(args.params.yield_unit, Some(YieldUnit::Fraction));
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["divvy", "--json", "-q", "check", "config"]).unwrap();
        assert!(cli.json);
        assert!(cli.quiet);
        assert_eq!(cli.verbose, 0);
        assert!(matches!(cli.color, ColorChoice::Auto));
        assert!(matches!(cli.command, Commands::Check(CheckCommand::Config(_))));
    }

    #[test]
    fn test_verbose_counts() {
        let cli = Cli::try_parse_from(["divvy", "-vv", "--color", "never", "check", "config"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.color, ColorChoice::Never));
    }

    #[test]
    fn test_rejects_non_numeric_funds() {
        assert!(Cli::try_parse_from(["divvy", "allocate", "--funds", "lots"]).is_err());
    }
}
