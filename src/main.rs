use clap::Parser;
use divvy::adapter::inbound::cli::command::{CheckCommand, Cli, ColorChoice, Commands};
use divvy::adapter::inbound::cli::output::{self, OutputConfig};
use divvy::adapter::inbound::cli::{allocate, check, model};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    match cli.color {
        ColorChoice::Auto => {}
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
    }
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    let result = match &cli.command {
        Commands::Allocate(args) => allocate::execute(args).await,
        Commands::Model(args) => model::execute(args),
        Commands::Check(CheckCommand::Config(args)) => check::execute_config(&args.config),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
