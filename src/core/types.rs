//! Core data types for the period comparison pipeline
//!
//! A `Dataset` is loaded once and never mutated. Every later stage borrows
//! from it and produces a new view (`Cohort`, filtered `Vec<&Record>`).

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::consts::DATE_FORMAT;
use crate::error::AppError;

/// One row of the input file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Record {
    /// 1-based line number in the source file (header is line 1)
    pub(crate) line: usize,
    /// `None` when the date cell failed to parse
    pub(crate) date: Option<NaiveDate>,
    /// Date cell as it appeared in the file
    pub(crate) raw_date: String,
    pub(crate) page: String,
    /// `None` when the cell was empty or not a non-negative integer
    pub(crate) clicks: Option<u64>,
    pub(crate) impressions: Option<u64>,
}

impl Record {
    pub(crate) fn metric(&self, metric: Metric) -> Option<u64> {
        match metric {
            Metric::Clicks => self.clicks,
            Metric::Impressions => self.impressions,
        }
    }

    pub(crate) fn has_valid_date(&self) -> bool {
        self.date.is_some()
    }
}

/// Immutable, ordered collection of records
#[derive(Debug, Default)]
pub(crate) struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub(crate) fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub(crate) fn records(&self) -> &[Record] {
        &self.records
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows kept for inspection whose date failed to parse
    pub(crate) fn invalid_dates(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|r| !r.has_valid_date())
    }

    /// Rows where at least one metric cell failed to parse
    pub(crate) fn null_metrics(&self) -> impl Iterator<Item = &Record> {
        self.records
            .iter()
            .filter(|r| r.clicks.is_none() || r.impressions.is_none())
    }
}

/// Inclusive date range, `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct DateWindow {
    pub(crate) start: NaiveDate,
    pub(crate) end: NaiveDate,
}

impl DateWindow {
    pub(crate) fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::InvalidRange {
                start: start.format(DATE_FORMAT).to_string(),
                end: end.format(DATE_FORMAT).to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Plain day delta `end - start` (a single-day window has length 0)
    pub(crate) fn length_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Both ends moved back by `days`
    pub(crate) fn shifted_back(&self, days: i64) -> Self {
        Self {
            start: self.start - Duration::days(days),
            end: self.end - Duration::days(days),
        }
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Period {
    Test,
    PreTest,
    YearOverYear,
}

impl Period {
    pub(crate) const BASELINES: [Period; 2] = [Period::PreTest, Period::YearOverYear];

    pub(crate) fn label(self) -> &'static str {
        match self {
            Period::Test => "Test",
            Period::PreTest => "Pre-test",
            Period::YearOverYear => "YoY",
        }
    }

    pub(crate) fn key(self) -> &'static str {
        match self {
            Period::Test => "test",
            Period::PreTest => "pre_test",
            Period::YearOverYear => "year_over_year",
        }
    }
}

/// Test window plus the two baselines derived from it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct PeriodSet {
    pub(crate) test: DateWindow,
    pub(crate) pre_test: DateWindow,
    pub(crate) year_over_year: DateWindow,
}

impl PeriodSet {
    pub(crate) fn window(&self, period: Period) -> DateWindow {
        match period {
            Period::Test => self.test,
            Period::PreTest => self.pre_test,
            Period::YearOverYear => self.year_over_year,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum CohortKind {
    Test,
    Control,
}

impl CohortKind {
    pub(crate) fn label(self) -> &'static str {
        match self {
            CohortKind::Test => "Test",
            CohortKind::Control => "Control",
        }
    }

    pub(crate) fn key(self) -> &'static str {
        match self {
            CohortKind::Test => "test",
            CohortKind::Control => "control",
        }
    }
}

/// Named view over a dataset's rows
#[derive(Debug, Clone)]
pub(crate) struct Cohort<'a> {
    pub(crate) kind: CohortKind,
    pub(crate) rows: Vec<&'a Record>,
}

impl<'a> Cohort<'a> {
    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Metric {
    Clicks,
    Impressions,
}

impl Metric {
    pub(crate) const ALL: [Metric; 2] = [Metric::Clicks, Metric::Impressions];

    pub(crate) fn label(self) -> &'static str {
        match self {
            Metric::Clicks => "Clicks",
            Metric::Impressions => "Impressions",
        }
    }

    pub(crate) fn key(self) -> &'static str {
        match self {
            Metric::Clicks => "clicks",
            Metric::Impressions => "impressions",
        }
    }
}

/// Totals for one (cohort, window) pair
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub(crate) struct MetricSummary {
    pub(crate) clicks_total: u64,
    pub(crate) impressions_total: u64,
    /// Distinct valid dates present
    pub(crate) day_count: usize,
    pub(crate) unique_page_count: usize,
    pub(crate) row_count: usize,
}

impl MetricSummary {
    pub(crate) fn total(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Clicks => self.clicks_total,
            Metric::Impressions => self.impressions_total,
        }
    }

    /// `None` when no day is present
    pub(crate) fn per_day(&self, metric: Metric) -> Option<f64> {
        if self.day_count == 0 {
            return None;
        }
        Some(self.total(metric) as f64 / self.day_count as f64)
    }

    /// Click-through rate as a fraction, `None` without impressions
    pub(crate) fn ctr(&self) -> Option<f64> {
        if self.impressions_total == 0 {
            return None;
        }
        Some(self.clicks_total as f64 / self.impressions_total as f64)
    }
}

/// Why a significance test produced no p-value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub(crate) enum NotComputable {
    /// Fewer than two observations on one side
    InsufficientSamples { current: usize, baseline: usize },
    /// Both samples are constant
    ZeroVariance,
    /// Significance stage disabled
    Skipped,
}

impl NotComputable {
    pub(crate) fn describe(self) -> String {
        match self {
            NotComputable::InsufficientSamples { current, baseline } => {
                format!("n/a (n={current} vs n={baseline})")
            }
            NotComputable::ZeroVariance => "n/a (zero variance)".to_string(),
            NotComputable::Skipped => "skipped".to_string(),
        }
    }
}

/// Outcome of Welch's t-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub(crate) enum Significance {
    Computed {
        t_statistic: f64,
        degrees_of_freedom: f64,
        p_value: f64,
    },
    NotComputable(NotComputable),
}

impl Significance {
    pub(crate) fn p_value(&self) -> Option<f64> {
        match self {
            Significance::Computed { p_value, .. } => Some(*p_value),
            Significance::NotComputable(_) => None,
        }
    }
}

/// Which quantity is compared between periods
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum DiffBasis {
    /// Period totals
    #[default]
    Total,
    /// Totals divided by distinct days present
    DailyAverage,
}

impl DiffBasis {
    pub(crate) fn value(self, summary: &MetricSummary, metric: Metric) -> Option<f64> {
        match self {
            DiffBasis::Total => Some(summary.total(metric) as f64),
            DiffBasis::DailyAverage => summary.per_day(metric),
        }
    }
}

/// Current period vs one baseline, for one cohort and metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ComparisonResult {
    pub(crate) cohort: CohortKind,
    pub(crate) baseline: Period,
    pub(crate) metric: Metric,
    pub(crate) current_value: Option<f64>,
    pub(crate) baseline_value: Option<f64>,
    pub(crate) absolute_diff: Option<f64>,
    pub(crate) relative_diff_percent: Option<f64>,
    pub(crate) p_value: Option<f64>,
    pub(crate) significant: bool,
    pub(crate) significance: Significance,
}
