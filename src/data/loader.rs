//! CSV loader for Search Console landing-page exports

use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use csv::{ByteRecord, ReaderBuilder, Trim};

use crate::consts::{CLICKS_COLUMN, DATE_COLUMN, IMPRESSIONS_COLUMN, PAGE_COLUMN};
use crate::core::{Dataset, Record};
use crate::error::AppError;
use crate::utils::parse_cell_date;

/// Loaded dataset plus counts of recovered cell failures
#[derive(Debug, Default)]
pub(crate) struct LoadResult {
    pub(crate) dataset: Dataset,
    pub(crate) invalid_dates: usize,
    pub(crate) null_clicks: usize,
    pub(crate) null_impressions: usize,
    pub(crate) elapsed_ms: f64,
}

/// Header positions of the required columns
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    page: usize,
    clicks: usize,
    impressions: usize,
}

impl Columns {
    fn resolve(headers: &ByteRecord) -> Result<Self, AppError> {
        let find = |name: &str| {
            headers
                .iter()
                .map(String::from_utf8_lossy)
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
                .ok_or_else(|| AppError::Schema {
                    column: name.to_string(),
                })
        };
        // Date first so a file without it reports that column
        Ok(Self {
            date: find(DATE_COLUMN)?,
            page: find(PAGE_COLUMN)?,
            clicks: find(CLICKS_COLUMN)?,
            impressions: find(IMPRESSIONS_COLUMN)?,
        })
    }
}

/// Cell text; bytes that are not UTF-8 become U+FFFD
fn cell(row: &ByteRecord, index: usize) -> Option<Cow<'_, str>> {
    row.get(index).map(String::from_utf8_lossy)
}

/// Non-negative whole number, or `None`. `"12.0"` is accepted as 12.
fn parse_metric(cell: Option<&str>) -> Option<u64> {
    let cell = cell?.trim();
    if cell.is_empty() {
        return None;
    }
    if let Ok(n) = cell.parse::<u64>() {
        return Some(n);
    }
    let f = cell.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

pub(crate) fn load_dataset(path: &Path) -> Result<LoadResult, AppError> {
    let file = File::open(path).map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let result = read_dataset(file)?;
    tracing::debug!(
        path = %path.display(),
        rows = result.dataset.len(),
        elapsed_ms = result.elapsed_ms,
        "loaded dataset"
    );
    Ok(result)
}

/// Parse CSV from any reader. Rows with bad cells are kept with null markers.
pub(crate) fn read_dataset<R: Read>(reader: R) -> Result<LoadResult, AppError> {
    let start = Instant::now();
    let mut csv = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = Columns::resolve(csv.byte_headers()?)?;

    let mut records = Vec::new();
    let mut result = LoadResult::default();

    // Non-UTF-8 cells are decoded lossily and the row is kept
    for (i, row) in csv.byte_records().enumerate() {
        let row = row?;
        let line = row
            .position()
            .map_or(i + 2, |p| usize::try_from(p.line()).unwrap_or(i + 2));
        let raw_date = cell(&row, columns.date).unwrap_or_default().into_owned();
        let date = parse_cell_date(&raw_date);
        let clicks = parse_metric(cell(&row, columns.clicks).as_deref());
        let impressions = parse_metric(cell(&row, columns.impressions).as_deref());

        if date.is_none() {
            result.invalid_dates += 1;
        }
        if clicks.is_none() {
            result.null_clicks += 1;
        }
        if impressions.is_none() {
            result.null_impressions += 1;
        }

        records.push(Record {
            line,
            date,
            raw_date,
            page: cell(&row, columns.page).unwrap_or_default().into_owned(),
            clicks,
            impressions,
        });
    }

    if result.invalid_dates > 0 {
        tracing::warn!(
            rows = result.invalid_dates,
            "rows with dates not in YYYY-MM-DD format are excluded from every period"
        );
    }
    if result.null_clicks > 0 || result.null_impressions > 0 {
        tracing::warn!(
            clicks = result.null_clicks,
            impressions = result.null_impressions,
            "non-numeric metric cells count as 0 in totals"
        );
    }

    result.dataset = Dataset::new(records);
    result.elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    Ok(result)
}
