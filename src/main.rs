use anyhow::Result;
use clap::Parser;
use colored::*;
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use tooleval::cli::{Cli, Commands};
use tooleval::config::Overrides;
use tooleval::error::EvalError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    configure_output(&cli.command);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), error_message(&err));
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Evaluate {
            inputs,
            output_dir,
            structured_format,
            human_format,
        } => {
            let overrides = Overrides {
                output_dir,
                structured_format,
                human_format,
                ..inputs.overrides()
            };
            let outcome =
                tooleval::commands::handle_evaluate(inputs.config.as_deref(), overrides)?;
            if let Some(leader) = outcome.evaluation.results.first() {
                println!(
                    "{} {} tools ranked, top: {} ({:.3})",
                    "Evaluation complete:".green().bold(),
                    outcome.evaluation.results.len(),
                    leader.tool,
                    leader.weighted_total
                );
            }
            println!("  {}", outcome.reports.structured.display());
            println!("  {}", outcome.reports.human.display());
            Ok(())
        }
        Commands::Validate { inputs } => {
            let evaluation =
                tooleval::commands::handle_validate(inputs.config.as_deref(), inputs.overrides())?;
            println!(
                "{} {} tools, {} criteria",
                "Inputs are valid:".green().bold(),
                evaluation.results.len(),
                evaluation.criteria.len()
            );
            Ok(())
        }
        Commands::Init { force } => {
            for path in tooleval::commands::init_project(Path::new("."), force)? {
                println!("Created {}", path.display());
            }
            Ok(())
        }
    }
}

// Side effects at the edge: logging and color setup
fn configure_output(command: &Commands) {
    let verbosity = match command {
        Commands::Evaluate { inputs, .. } | Commands::Validate { inputs } => inputs.verbosity,
        Commands::Init { .. } => 0,
    };
    tooleval::observability::init_tracing(verbosity);

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}

// EvalError messages already include the text of their I/O source
fn error_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<EvalError>() {
        Some(eval_err) => eval_err.to_string(),
        None => format!("{err:#}"),
    }
}

// Pure function to map an error chain to a process exit code
fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<EvalError>()
        .map_or(1, EvalError::exit_code)
        .try_into()
        .unwrap_or(1)
}
