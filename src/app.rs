use crate::cli::{Cli, Commands};
use crate::core::{derive_periods, run_analysis};
use crate::data::{LoadResult, load_dataset};
use crate::error::AppError;
use crate::output::{
    NumberFormat, TableOptions, output_invalid_csv, output_invalid_json, output_periods_json,
    output_report_csv, output_report_json, print_invalid_table, print_periods_table,
    print_report_table,
};

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) number_format: NumberFormat,
}

impl CommandContext<'_> {
    fn table_options(&self) -> TableOptions {
        TableOptions {
            use_color: self.cli.use_color(),
            compact: self.cli.compact,
            number_format: self.number_format,
        }
    }

    fn load(&self) -> Result<LoadResult, AppError> {
        load_dataset(self.cli.input_file()?)
    }
}

fn print_load_summary(load: &LoadResult) {
    println!(
        "\n  Loaded {} rows in {:.0}ms ({} invalid dates, {} null clicks, {} null impressions)",
        load.dataset.len(),
        load.elapsed_ms,
        load.invalid_dates,
        load.null_clicks,
        load.null_impressions
    );
}

fn handle_analyze(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    // Bad patterns and dates fail before the file is touched
    let config = ctx.cli.analysis_config()?;
    let load = ctx.load()?;
    if load.dataset.is_empty() {
        tracing::warn!("input file has no data rows");
    }
    let report = run_analysis(&load.dataset, &config)?;

    if ctx.cli.json {
        println!("{}", output_report_json(&report, &load)?);
    } else if ctx.cli.csv {
        print!("{}", output_report_csv(&report)?);
    } else {
        print_load_summary(&load);
        print_report_table(&report, ctx.table_options());
    }
    Ok(())
}

fn handle_periods(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let periods = derive_periods(ctx.cli.test_window()?);
    if ctx.cli.json {
        println!("{}", output_periods_json(&periods)?);
    } else {
        print_periods_table(&periods, ctx.table_options());
    }
    Ok(())
}

fn handle_invalid(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let load = ctx.load()?;
    if ctx.cli.json {
        println!("{}", output_invalid_json(&load.dataset)?);
    } else if ctx.cli.csv {
        print!("{}", output_invalid_csv(&load.dataset)?);
    } else {
        print_invalid_table(&load.dataset, ctx.table_options());
    }
    Ok(())
}

pub(crate) fn handle_command(command: Commands, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    tracing::debug!(?command, "dispatching command");
    match command {
        Commands::Analyze => handle_analyze(ctx),
        Commands::Periods => handle_periods(ctx),
        Commands::Invalid => handle_invalid(ctx),
    }
}
