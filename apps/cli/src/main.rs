//! steam-vdf command line entry point.

mod app;
mod cli;
mod commands;
mod config;
mod console;
mod dump;
mod logging;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    // Logging needs the log file path, so configuration comes first.
    let (config, config_error) = match config::Config::load() {
        Ok(config) => (config, None),
        Err(e) => (config::Config::default(), Some(e)),
    };

    logging::init(cli.debug, &config.log_file());
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting steam-vdf");
    if let Some(e) = config_error {
        tracing::warn!("could not load configuration, using defaults: {e:#}");
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(app::run(cli, config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
