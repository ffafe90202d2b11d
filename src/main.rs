use anyhow::Result;
use clap::Parser;
use surveymap::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { force } => surveymap::commands::init::init_config(*force),
        command => {
            let verbosity = command.report_args().map_or(0, |a| a.verbosity);
            surveymap::observability::init_logging(verbosity);
            surveymap::commands::report::run_report(command)
        }
    }
}
