//! Diagnostics go to stderr through a single `tracing` subscriber.
//!
//! The library crates only emit events; this is the one place a subscriber
//! is installed. Levels follow the flags:
//!
//! | Flags     | Level |
//! |-----------|-------|
//! | default   | warn  |
//! | `-v`      | info  |
//! | `-vv`     | debug |
//! | `-vvv`    | trace |
//! | `--quiet` | error |
//!
//! A set `RUST_LOG` replaces the derived filter entirely. With
//! `--output-format json` the events themselves are JSON lines, so scripts
//! reading stdout can also parse stderr.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{GlobalArgs, OutputFormat};

const CRATES: [&str; 3] = ["craftvista", "craftvista_core", "craftvista_adapters"];

/// Install the process-wide subscriber. Fails if one is already set.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives(derive_level(args))));

    let registry = tracing_subscriber::registry().with(filter);

    let installed = if args.output_format == OutputFormat::Json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(!args.no_color && std::io::stderr().is_terminal())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    installed.map_err(|e| anyhow::anyhow!("tracing subscriber already installed: {e}"))
}

fn directives(level: &str) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn derive_level(args: &GlobalArgs) -> &'static str {
    match (args.quiet, args.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    }
}
