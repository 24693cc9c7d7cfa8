//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigBasis, ConfigColorMode};
use crate::core::{AnalysisConfig, DateWindow, DiffBasis};
use crate::error::AppError;
use crate::utils::parse_date;

use super::commands::Commands;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum Basis {
    /// Compare period totals (default)
    #[default]
    Total,
    /// Compare totals divided by the number of days with data
    DailyAverage,
}

impl From<Basis> for DiffBasis {
    fn from(basis: Basis) -> Self {
        match basis {
            Basis::Total => DiffBasis::Total,
            Basis::DailyAverage => DiffBasis::DailyAverage,
        }
    }
}

#[derive(Parser)]
#[command(name = "gscdiff")]
#[command(
    about = "Compare Search Console clicks and impressions for a page group before and after a change",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Search Console CSV export (Date, Landing Page, Url Clicks, Impressions)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub(crate) file: Option<PathBuf>,

    /// Regex selecting test-group pages (case-insensitive)
    #[arg(short, long, global = true, value_name = "REGEX")]
    pub(crate) test: Option<String>,

    /// Regex selecting control-group pages; defaults to every non-test page
    #[arg(short = 'C', long, global = true, value_name = "REGEX")]
    pub(crate) control: Option<String>,

    /// First day of the test period (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long, global = true, value_name = "DATE")]
    pub(crate) start: Option<String>,

    /// Last day of the test period (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long, global = true, value_name = "DATE")]
    pub(crate) end: Option<String>,

    /// What to compare between periods
    #[arg(long, global = true, value_enum, default_value = "total")]
    pub(crate) basis: Basis,

    /// Skip Welch's t-test
    #[arg(long, global = true)]
    pub(crate) no_significance: bool,

    /// Significance level for flagging p-values
    #[arg(long, global = true, value_name = "P")]
    pub(crate) alpha: Option<f64>,

    /// Fail when the control pattern also matches test pages
    #[arg(long, global = true)]
    pub(crate) reject_overlap: bool,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Output as CSV
    #[arg(long, global = true, conflicts_with = "json")]
    pub(crate) csv: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Compact output (fewer columns)
    #[arg(short = 'c', long, global = true)]
    pub(crate) compact: bool,

    /// Locale for number formatting (e.g., "en", "de", "fr")
    #[arg(long, global = true, value_name = "LOCALE")]
    pub(crate) locale: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // Boolean flags: config only applies if CLI left them off
        self.compact |= config.compact;
        self.no_color |= config.no_color;
        self.no_significance |= config.no_significance;
        self.reject_overlap |= config.reject_overlap;
        self.debug |= config.debug;

        // Enum values: only override the CLI default
        if let Some(color) = config.color
            && self.color == ColorMode::Auto
        {
            self.color = match color {
                ConfigColorMode::Auto => ColorMode::Auto,
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
            };
        }

        if let Some(basis) = config.basis
            && self.basis == Basis::Total
        {
            self.basis = match basis {
                ConfigBasis::Total => Basis::Total,
                ConfigBasis::DailyAverage => Basis::DailyAverage,
            };
        }

        if self.alpha.is_none() {
            self.alpha = config.alpha;
        }
        if self.locale.is_none() {
            self.locale = config.locale.clone();
        }

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }

    pub(crate) fn test_window(&self) -> Result<DateWindow, AppError> {
        let start = self
            .start
            .as_deref()
            .ok_or(AppError::MissingArgument { name: "--start" })?;
        let end = self
            .end
            .as_deref()
            .ok_or(AppError::MissingArgument { name: "--end" })?;
        DateWindow::new(parse_date(start)?, parse_date(end)?)
    }

    pub(crate) fn input_file(&self) -> Result<&PathBuf, AppError> {
        self.file
            .as_ref()
            .ok_or(AppError::MissingArgument { name: "--file" })
    }

    /// Validate every pipeline parameter before any file is read
    pub(crate) fn analysis_config(&self) -> Result<AnalysisConfig, AppError> {
        let test_window = self.test_window()?;
        let test = self
            .test
            .as_deref()
            .ok_or(AppError::MissingArgument { name: "--test" })?;
        let mut config = AnalysisConfig::new(test, self.control.as_deref(), test_window)?;

        if let Some(alpha) = self.alpha {
            if !(alpha > 0.0 && alpha < 1.0) {
                return Err(AppError::InvalidAlpha { value: alpha });
            }
            config.alpha = alpha;
        }
        config.basis = self.basis.into();
        config.significance = !self.no_significance;
        config.reject_overlap = self.reject_overlap;
        Ok(config)
    }
}
