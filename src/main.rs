mod app;
mod cli;
mod config;
mod consts;
mod core;
mod data;
mod error;
mod output;
mod utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, Registry, prelude::*, reload};

use app::{CommandContext, handle_command};
use cli::{Cli, parse_command};
use config::Config;
use output::NumberFormat;

type FilterHandle = reload::Handle<EnvFilter, Registry>;

fn env_filter(debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Logs go to stderr so JSON/CSV on stdout stays clean
fn init_tracing(debug: bool) -> FilterHandle {
    let (filter, handle) = reload::Layer::new(env_filter(debug));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    handle
}

fn main() {
    let cli = Cli::parse();
    let cli_debug = cli.debug;
    let filter = init_tracing(cli_debug);

    // Merge config file settings (CLI args take precedence)
    let cli = cli.with_config(&Config::load());
    if cli.debug
        && !cli_debug
        && let Err(e) = filter.reload(env_filter(true))
    {
        eprintln!("Warning: failed to enable debug logging: {e}");
    }

    let number_format = match NumberFormat::from_locale(cli.locale.as_deref()) {
        Ok(format) => format,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let ctx = CommandContext {
        cli: &cli,
        number_format,
    };
    let command = parse_command(cli.command);

    if let Err(e) = handle_command(command, &ctx) {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
