use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, TableComponent,
    modifiers::UTF8_SOLID_INNER_BORDERS, presets::UTF8_FULL,
};

use crate::core::{Record, Significance};
use crate::error::AppError;

#[derive(Debug, Clone, Copy)]
pub(crate) struct NumberFormat {
    group_sep: char,
    decimal_sep: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat {
            group_sep: ',',
            decimal_sep: '.',
        }
    }
}

impl NumberFormat {
    pub(crate) fn from_locale(locale: Option<&str>) -> Result<Self, AppError> {
        let Some(raw) = locale else {
            return Ok(NumberFormat::default());
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(NumberFormat::default());
        }
        let base = trimmed
            .split(['-', '_'])
            .next()
            .unwrap_or(trimmed)
            .to_ascii_lowercase();

        let format = match base.as_str() {
            "de" => NumberFormat {
                group_sep: '.',
                decimal_sep: ',',
            },
            "fr" | "ru" => NumberFormat {
                group_sep: ' ',
                decimal_sep: ',',
            },
            "en" | "zh" => NumberFormat::default(),
            _ => {
                return Err(AppError::UnsupportedLocale {
                    input: trimmed.to_string(),
                });
            }
        };

        Ok(format)
    }
}

fn group_digits(digits: &str, sep: char) -> String {
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(sep);
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

pub(super) fn format_number(n: u64, format: NumberFormat) -> String {
    group_digits(&n.to_string(), format.group_sep)
}

/// Grouped number with `decimals` fraction digits and a sign for negatives
pub(super) fn format_decimal(value: f64, decimals: usize, format: NumberFormat) -> String {
    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };
    let sign = if value < 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    let mut out = format!("{sign}{}", group_digits(int_part, format.group_sep));
    if let Some(frac) = frac_part {
        out.push(format.decimal_sep);
        out.push_str(frac);
    }
    out
}

/// Metric value with a fixed number of fraction digits
pub(super) fn format_value(value: Option<f64>, decimals: usize, format: NumberFormat) -> String {
    match value {
        None => "n/a".to_string(),
        Some(v) => format_decimal(v, decimals, format),
    }
}

pub(super) fn format_signed(value: Option<f64>, decimals: usize, format: NumberFormat) -> String {
    match value {
        Some(v) if v > 0.0 => format!("+{}", format_decimal(v, decimals, format)),
        _ => format_value(value, decimals, format),
    }
}

pub(super) fn format_percent(value: Option<f64>, format: NumberFormat) -> String {
    match value {
        None => "n/a".to_string(),
        Some(v) if v > 0.0 => format!("+{}%", format_decimal(v, 1, format)),
        Some(v) => format!("{}%", format_decimal(v, 1, format)),
    }
}

pub(super) fn format_points(value: Option<f64>, format: NumberFormat) -> String {
    match value {
        None => "n/a".to_string(),
        Some(v) if v > 0.0 => format!("+{} pp", format_decimal(v, 1, format)),
        Some(v) => format!("{} pp", format_decimal(v, 1, format)),
    }
}

pub(super) fn format_ctr(value: Option<f64>, format: NumberFormat) -> String {
    match value {
        None => "n/a".to_string(),
        Some(v) => format!("{}%", format_decimal(v * 100.0, 2, format)),
    }
}

pub(super) fn format_significance(sig: &Significance) -> String {
    match sig {
        Significance::Computed { p_value, .. } if *p_value < 0.0001 => "<0.0001".to_string(),
        Significance::Computed { p_value, .. } => format!("{p_value:.4}"),
        Significance::NotComputable(reason) => reason.describe(),
    }
}

/// Parse problems of one row, empty for a clean row
pub(super) fn record_issues(record: &Record) -> Vec<&'static str> {
    let mut issues = Vec::new();
    if record.date.is_none() {
        issues.push("invalid_date");
    }
    if record.clicks.is_none() {
        issues.push("null_clicks");
    }
    if record.impressions.is_none() {
        issues.push("null_impressions");
    }
    issues
}

pub(super) fn styled_cell(text: &str, color: Option<Color>, bold: bool) -> Cell {
    let mut cell = Cell::new(text);
    if let Some(c) = color {
        cell = cell.fg(c);
    }
    if bold {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}

pub(super) fn header_cell(text: &str, use_color: bool) -> Cell {
    let mut cell = Cell::new(text).add_attribute(Attribute::Bold);
    if use_color {
        cell = cell.fg(Color::Cyan);
    }
    cell
}

pub(super) fn right_cell(text: &str, color: Option<Color>, bold: bool) -> Cell {
    styled_cell(text, color, bold).set_alignment(CellAlignment::Right)
}

/// Green for gains, red for losses
pub(super) fn change_color(value: Option<f64>, use_color: bool) -> Option<Color> {
    if !use_color {
        return None;
    }
    match value {
        Some(v) if v > 0.0 => Some(Color::Green),
        Some(v) if v < 0.0 => Some(Color::Red),
        _ => None,
    }
}

/// Replace the double-line header separator (╞═╪═╡) with single-line (├─┼─┤)
fn normalize_header_separator(table: &mut Table) {
    table.set_style(TableComponent::HeaderLines, '─');
    table.set_style(TableComponent::LeftHeaderIntersection, '├');
    table.set_style(TableComponent::MiddleHeaderIntersections, '┼');
    table.set_style(TableComponent::RightHeaderIntersection, '┤');
}

/// Create a table with the standard preset, inner borders, and normalized header separator.
pub(super) fn create_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    normalize_header_separator(&mut table);
    table
}
