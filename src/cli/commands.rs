//! CLI subcommand definitions

use clap::Subcommand;

/// Main CLI commands
#[derive(Debug, Clone, Copy, Subcommand, PartialEq, Eq)]
pub(crate) enum Commands {
    /// Compare the test period against pre-test and year-over-year (default)
    Analyze,
    /// Show the comparison windows derived from --start/--end
    Periods,
    /// List rows with unparseable dates or metric values
    Invalid,
}

/// Resolve the command to run, defaulting to `analyze`
pub(crate) fn parse_command(cmd: Option<Commands>) -> Commands {
    cmd.unwrap_or(Commands::Analyze)
}
