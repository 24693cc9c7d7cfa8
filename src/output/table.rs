use comfy_table::{Cell, Color, Table};

use crate::core::{
    AnalysisReport, CohortKind, CohortReport, Dataset, DiffBasis, Period, PeriodSet,
};
use crate::output::format::{
    NumberFormat, change_color, create_styled_table, format_ctr, format_number, format_percent,
    format_points, format_signed, format_significance, format_value, header_cell, record_issues,
    right_cell, styled_cell,
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct TableOptions {
    pub(crate) use_color: bool,
    pub(crate) compact: bool,
    pub(crate) number_format: NumberFormat,
}

fn headers(names: &[&str], use_color: bool) -> Vec<Cell> {
    names.iter().map(|n| header_cell(n, use_color)).collect()
}

fn summary_table(cohort: &CohortReport, opts: &TableOptions) -> Table {
    let nf = opts.number_format;
    let mut table = create_styled_table();
    if opts.compact {
        table.set_header(headers(&["Period", "Clicks", "Impressions"], opts.use_color));
    } else {
        table.set_header(headers(
            &[
                "Period",
                "Window",
                "Days",
                "Pages",
                "Clicks",
                "Impressions",
                "CTR",
                "Clicks/day",
                "Impr/day",
            ],
            opts.use_color,
        ));
    }

    for p in &cohort.periods {
        let s = &p.summary;
        let bold = p.period == Period::Test;
        let mut row = vec![styled_cell(p.period.label(), None, bold)];
        if !opts.compact {
            row.extend([
                Cell::new(p.window.to_string()),
                right_cell(&s.day_count.to_string(), None, false),
                right_cell(&s.unique_page_count.to_string(), None, false),
            ]);
        }
        row.extend([
            right_cell(&format_number(s.clicks_total, nf), None, bold),
            right_cell(&format_number(s.impressions_total, nf), None, bold),
        ]);
        if !opts.compact {
            row.extend([
                right_cell(&format_ctr(p.ctr, nf), None, false),
                right_cell(&format_value(p.clicks_per_day, 1, nf), None, false),
                right_cell(&format_value(p.impressions_per_day, 1, nf), None, false),
            ]);
        }
        table.add_row(row);
    }
    table
}

/// Totals are whole numbers; daily averages always show one decimal
fn value_decimals(basis: DiffBasis) -> usize {
    match basis {
        DiffBasis::Total => 0,
        DiffBasis::DailyAverage => 1,
    }
}

fn comparison_table(report: &AnalysisReport, opts: &TableOptions) -> Table {
    let nf = opts.number_format;
    let mut table = create_styled_table();
    let mut names = vec!["Group", "vs", "Metric"];
    if !opts.compact {
        names.extend(["Current", "Baseline", "Change"]);
    }
    names.extend(["Change %", "p-value"]);
    table.set_header(headers(&names, opts.use_color));

    let highlight = if opts.use_color { Some(Color::Yellow) } else { None };
    let decimals = value_decimals(report.basis);

    for cohort in &report.cohorts {
        for c in &cohort.comparisons {
            let color = change_color(c.relative_diff_percent, opts.use_color);
            let mut row = vec![
                Cell::new(c.cohort.label()),
                Cell::new(c.baseline.label()),
                Cell::new(c.metric.label()),
            ];
            if !opts.compact {
                row.extend([
                    right_cell(&format_value(c.current_value, decimals, nf), None, false),
                    right_cell(&format_value(c.baseline_value, decimals, nf), None, false),
                    right_cell(&format_signed(c.absolute_diff, decimals, nf), color, false),
                ]);
            }
            row.extend([
                right_cell(&format_percent(c.relative_diff_percent, nf), color, false),
                right_cell(
                    &format_significance(&c.significance),
                    if c.significant { highlight } else { None },
                    c.significant,
                ),
            ]);
            table.add_row(row);
        }
    }
    table
}

fn net_effect_table(report: &AnalysisReport, opts: &TableOptions) -> Table {
    let nf = opts.number_format;
    let mut table = create_styled_table();
    table.set_header(headers(
        &["vs", "Metric", "Test %", "Control %", "Net"],
        opts.use_color,
    ));
    for n in &report.net_effects {
        table.add_row(vec![
            Cell::new(n.baseline.label()),
            Cell::new(n.metric.label()),
            right_cell(&format_percent(n.test_relative_diff_percent, nf), None, false),
            right_cell(&format_percent(n.control_relative_diff_percent, nf), None, false),
            right_cell(
                &format_points(n.net_diff_points, nf),
                change_color(n.net_diff_points, opts.use_color),
                true,
            ),
        ]);
    }
    table
}

fn cohort_title(report: &AnalysisReport, kind: CohortKind) -> String {
    match kind {
        CohortKind::Test => format!("Test group  /{}/", report.test_pattern),
        CohortKind::Control => match &report.control_pattern {
            Some(p) => format!("Control group  /{p}/"),
            None => "Control group  (all other pages)".to_string(),
        },
    }
}

/// Footnotes printed under the tables
fn notes(report: &AnalysisReport) -> Vec<String> {
    let mut notes = vec![format!("{}.", report.yoy_note)];
    if report.control_overlap_rows > 0 {
        notes.push(format!(
            "{} rows match both the test and control patterns and are counted in both groups.",
            report.control_overlap_rows
        ));
    }
    if report.invalid_date_rows > 0 {
        notes.push(format!(
            "{} rows have invalid dates and are excluded from every period (see `gscdiff invalid`).",
            report.invalid_date_rows
        ));
    }
    notes
}

pub(crate) fn print_report_table(report: &AnalysisReport, opts: TableOptions) {
    println!("\n  Periods");
    println!("{}", periods_table(&report.periods, &opts));

    for cohort in &report.cohorts {
        println!("\n  {}  ({} rows)", cohort_title(report, cohort.cohort), cohort.row_count);
        println!("{}", summary_table(cohort, &opts));
    }

    println!("\n  Changes (test period vs baseline)");
    println!("{}", comparison_table(report, &opts));

    println!("\n  Net effect (test change minus control change)");
    println!("{}", net_effect_table(report, &opts));

    println!();
    for note in notes(report) {
        println!("  * {note}");
    }
    println!();
}

fn periods_table(periods: &PeriodSet, opts: &TableOptions) -> Table {
    let mut table = create_styled_table();
    table.set_header(headers(&["Period", "Start", "End", "Days"], opts.use_color));
    for period in [Period::Test, Period::PreTest, Period::YearOverYear] {
        let w = periods.window(period);
        table.add_row(vec![
            Cell::new(period.label()),
            Cell::new(w.start.to_string()),
            Cell::new(w.end.to_string()),
            right_cell(&(w.length_days() + 1).to_string(), None, false),
        ]);
    }
    table
}

pub(crate) fn print_periods_table(periods: &PeriodSet, opts: TableOptions) {
    println!("\n  Comparison windows\n");
    println!("{}", periods_table(periods, &opts));
    println!();
}

fn invalid_table(dataset: &Dataset, opts: &TableOptions) -> Table {
    let mut table = create_styled_table();
    table.set_header(headers(
        &["Line", "Date", "Landing Page", "Url Clicks", "Impressions"],
        opts.use_color,
    ));
    let red = if opts.use_color { Some(Color::Red) } else { None };
    let cell = |v: Option<u64>| match v {
        Some(n) => right_cell(&n.to_string(), None, false),
        None => right_cell("null", red, false),
    };

    for r in dataset.records() {
        if record_issues(r).is_empty() {
            continue;
        }
        let date = if r.date.is_some() {
            Cell::new(&r.raw_date)
        } else {
            styled_cell(&format!("{:?}", r.raw_date), red, false)
        };
        table.add_row(vec![
            right_cell(&r.line.to_string(), None, false),
            date,
            Cell::new(&r.page),
            cell(r.clicks),
            cell(r.impressions),
        ]);
    }
    table
}

pub(crate) fn print_invalid_table(dataset: &Dataset, opts: TableOptions) {
    let invalid_dates = dataset.invalid_dates().count();
    let null_rows = dataset.null_metrics().count();
    if invalid_dates == 0 && null_rows == 0 {
        println!("All {} rows parsed cleanly.", dataset.len());
        return;
    }
    println!(
        "\n  {} rows with invalid dates, {} rows with missing metrics\n",
        invalid_dates, null_rows
    );
    println!("{}", invalid_table(dataset, &opts));
    println!();
}
