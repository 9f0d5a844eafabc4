//! `craftvista`: author a marketplace listing from the terminal.
//!
//! `main` parses flags, installs the tracing subscriber, layers the
//! configuration, then hands off to one command handler. Failures come back
//! as a [`CliError`] and are rendered on stderr with suggestions.
//!
//! Exit status:
//!
//! - `0` listing published, or the command finished
//! - `1` internal fault or I/O failure
//! - `2` rejected input, not signed in, or publishing declined
//! - `3` unknown configuration key
//! - `4` bad configuration
//! - `5` identity, generator or store unavailable or timed out; safe to retry

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod wiring;

fn main() -> ExitCode {
    // Before tracing init; a missing .env is fine.
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => {
            // --help / --version
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}", e.render().ansi());
            return ExitCode::from(2);
        }
    };

    if let Err(e) = init_logging(&cli.global) {
        eprintln!("craftvista: {e}");
        return ExitCode::from(1);
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "starting"
    );

    let plain = cli.global.no_color;
    let config = match AppConfig::load(cli.global.config.as_ref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            let err = CliError::config("failed to load configuration", e);
            return report(err, cli.global.verbose > 0, plain);
        }
    };

    let output = OutputManager::new(&cli.global, &config);
    let plain = plain || config.output.no_color;
    let verbose = cli.global.verbose > 0;
    match run(cli, config, output) {
        Ok(()) => {
            info!("done");
            ExitCode::SUCCESS
        }
        Err(e) => report(e, verbose, plain),
    }
}

#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cli.command {
        Commands::New(cmd) => commands::new::execute(cmd, cli.global, config, output),
        Commands::Categories(cmd) => commands::categories::execute(cmd, output),
        Commands::Init(cmd) => commands::init::execute(cmd, output),
        Commands::Completions(cmd) => commands::completions::execute(cmd),
        Commands::Config(cmd) => commands::config::execute(cmd, config, output),
    }
}

fn report(err: CliError, verbose: bool, plain: bool) -> ExitCode {
    err.log();

    let color = !plain && std::io::IsTerminal::is_terminal(&std::io::stderr());
    eprint!("{}", err.render(verbose, color));

    ExitCode::from(err.exit_code())
}
