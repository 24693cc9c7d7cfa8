mod csv;
mod format;
mod json;
mod table;

pub(crate) use csv::{output_invalid_csv, output_report_csv};
pub(crate) use format::NumberFormat;
pub(crate) use json::{output_invalid_json, output_periods_json, output_report_json};
pub(crate) use table::{TableOptions, print_invalid_table, print_periods_table, print_report_table};
