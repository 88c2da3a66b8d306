//! Handler for the `model` command: print the formulation built for a catalog.

use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::ModelArgs;
use crate::adapter::inbound::cli::{output, prompt};
use crate::domain::{ProblemBuilder, ProblemInstance, VariableKind};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;

#[derive(Tabled)]
struct VariableRow {
    #[tabled(rename = "Var")]
    var: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Instrument")]
    instrument: String,
    #[tabled(rename = "Bounds")]
    bounds: String,
    #[tabled(rename = "Objective")]
    objective: String,
}

/// Execute the model command.
pub fn execute(args: &ModelArgs) -> Result<()> {
    let mut config = Config::load_or_default(&args.config)?;
    if let Some(unit) = args.params.yield_unit {
        config.catalog.format.yield_unit = unit;
    }
    config.validate()?;
    config.init_logging();

    let params = prompt::resolve(&args.params, &config.allocation)?;
    let catalog = bootstrap::build_catalog_loader(&config).load(&args.catalog)?;
    let problem = ProblemBuilder::new().build(&catalog, &params)?;

    if output::is_json() {
        output::json_output(serde_json::to_value(&problem)?);
        return Ok(());
    }

    print_model(&problem);
    Ok(())
}

fn print_model(problem: &ProblemInstance) {
    let params = problem.params();
    output::section(&format!("Model for {}", problem.catalog().label()));
    output::field("Instruments", problem.num_instruments());
    output::field("Variables", problem.num_vars());
    output::field("Constraints", problem.constraints().len());
    output::field("Funds", params.initial_funds());
    output::field("Min instruments", params.min_instruments());
    output::field("Max lots", params.max_lots());
    output::field("Tax rate", params.tax_rate());

    let instruments = problem.catalog().instruments();
    let n = problem.num_instruments();
    let rows: Vec<VariableRow> = problem
        .kinds()
        .iter()
        .enumerate()
        .map(|(index, kind)| {
            let bounds = &problem.bounds()[index];
            VariableRow {
                var: format!("x{index}"),
                kind: match kind {
                    VariableKind::Lots => "lots",
                    VariableKind::Held => "held",
                },
                instrument: instruments[index % n].name().to_string(),
                bounds: format!(
                    "[{}, {}]",
                    bounds.lower.map_or("-inf".to_string(), |lb| lb.normalize().to_string()),
                    bounds.upper.map_or("inf".to_string(), |ub| ub.normalize().to_string()),
                ),
                objective: problem.objective()[index].normalize().to_string(),
            }
        })
        .collect();

    output::section("Variables (maximise)");
    output::lines(&Table::new(rows).to_string());

    output::section("Constraints");
    let constraints: Vec<String> = problem
        .constraints()
        .iter()
        .map(|constraint| {
            format!(
                "{} {}",
                output::muted(format!("{:<16}", constraint.group.to_string())),
                constraint
            )
        })
        .collect();
    output::lines(&constraints.join("\n"));
    output::hint("variables x0..xn are lot counts, xn..x2n held flags");
}
