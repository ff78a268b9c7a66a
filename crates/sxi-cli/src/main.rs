use anyhow::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use sxi_cli::check::CheckOutcome;
use sxi_cli::cli::{self, GlobalArgs, UpdateArgs};
use sxi_cli::{check, export, init_logging, load_config, update};

fn main() -> Result<ExitCode> {
    let matches = cli::build().get_matches();
    let Some((name, args)) = matches.subcommand() else {
        return Ok(ExitCode::FAILURE);
    };

    let globals = GlobalArgs::from_matches(args);
    init_logging(globals.verbose);
    let config = load_config(&globals)?;

    match name {
        "check" => match check::check(&config.list_file())? {
            CheckOutcome::Normalized => {
                println!("OK");
                Ok(ExitCode::SUCCESS)
            }
            CheckOutcome::NotNormalized { diff } => {
                println!("ERROR: The file is not normalized");
                print!("{diff}");
                Ok(ExitCode::FAILURE)
            }
        },
        "update" => {
            let report = update::run(&config, &UpdateArgs::from_matches(args))?;
            if let Some(cancelled) = &report.cancelled {
                tracing::warn!(%cancelled, committed = report.committed.len(), "batch stopped");
            }
            Ok(ExitCode::SUCCESS)
        }
        "export-json" => {
            let output = args.get_one::<PathBuf>("output");
            export::run(&config.list_file(), output.map(PathBuf::as_path))?;
            Ok(ExitCode::SUCCESS)
        }
        other => anyhow::bail!("unknown subcommand `{other}`"),
    }
}
