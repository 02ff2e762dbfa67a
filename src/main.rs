mod cli;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use sm_tools::SystemRunner;
use sync_media::{config, controller::Controller, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.run_options();

    let settings = match load(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("sync-media: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&settings.paths.log_file, options.verbose) {
        eprintln!("sync-media: {e:#}");
        return ExitCode::FAILURE;
    }

    let mut controller = Controller::new(&options, &settings, SystemRunner);
    match controller.run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("sync failed: {e:?}");
            if options.verbose {
                eprintln!("\nsync failed: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn load(cli: &Cli) -> Result<config::Settings> {
    let workdir = config::resolve_workdir(cli.workdir.as_deref())?;
    config::load_settings_or_default(cli.config.as_deref(), &workdir)
}
