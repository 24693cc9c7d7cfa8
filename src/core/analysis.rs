//! Pipeline entry point: partition, filter, aggregate, compare

use serde::Serialize;

use crate::consts::{DEFAULT_ALPHA, YOY_NOTE, YOY_OFFSET_DAYS};
use crate::core::aggregator::{metric_sample, summarize};
use crate::core::cohort::{PagePattern, partition};
use crate::core::compare::{delta, net_effect};
use crate::core::filter::filter_window;
use crate::core::periods::derive_periods;
use crate::core::stats::welch_t_test;
use crate::core::types::{
    Cohort, CohortKind, ComparisonResult, Dataset, DateWindow, DiffBasis, Metric, MetricSummary,
    NotComputable, Period, PeriodSet, Record, Significance,
};
use crate::error::AppError;

/// Everything one analysis run needs besides the data
#[derive(Debug, Clone)]
pub(crate) struct AnalysisConfig {
    pub(crate) test_pattern: PagePattern,
    pub(crate) control_pattern: Option<PagePattern>,
    pub(crate) test_window: DateWindow,
    pub(crate) basis: DiffBasis,
    /// Run Welch's t-test for every comparison
    pub(crate) significance: bool,
    pub(crate) alpha: f64,
    /// Fail instead of reporting when the control pattern overlaps the test group
    pub(crate) reject_overlap: bool,
}

impl AnalysisConfig {
    pub(crate) fn new(
        test_pattern: &str,
        control_pattern: Option<&str>,
        test_window: DateWindow,
    ) -> Result<Self, AppError> {
        if test_pattern.trim().is_empty() {
            return Err(AppError::EmptyPattern);
        }
        Ok(Self {
            test_pattern: PagePattern::new(test_pattern.trim())?,
            control_pattern: PagePattern::optional(control_pattern)?,
            test_window,
            basis: DiffBasis::default(),
            significance: true,
            alpha: DEFAULT_ALPHA,
            reject_overlap: false,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PeriodSummary {
    pub(crate) period: Period,
    pub(crate) window: DateWindow,
    #[serde(flatten)]
    pub(crate) summary: MetricSummary,
    pub(crate) clicks_per_day: Option<f64>,
    pub(crate) impressions_per_day: Option<f64>,
    pub(crate) ctr: Option<f64>,
}

impl PeriodSummary {
    fn new(period: Period, window: DateWindow, summary: MetricSummary) -> Self {
        Self {
            period,
            window,
            clicks_per_day: summary.per_day(Metric::Clicks),
            impressions_per_day: summary.per_day(Metric::Impressions),
            ctr: summary.ctr(),
            summary,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CohortReport {
    pub(crate) cohort: CohortKind,
    /// Rows in the cohort before date filtering
    pub(crate) row_count: usize,
    pub(crate) periods: Vec<PeriodSummary>,
    pub(crate) comparisons: Vec<ComparisonResult>,
}

impl CohortReport {
    pub(crate) fn comparison(&self, baseline: Period, metric: Metric) -> Option<&ComparisonResult> {
        self.comparisons
            .iter()
            .find(|c| c.baseline == baseline && c.metric == metric)
    }
}

/// Test-group change net of the control-group change
#[derive(Debug, Clone, Serialize)]
pub(crate) struct NetEffect {
    pub(crate) baseline: Period,
    pub(crate) metric: Metric,
    pub(crate) test_relative_diff_percent: Option<f64>,
    pub(crate) control_relative_diff_percent: Option<f64>,
    /// Percentage points
    pub(crate) net_diff_points: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AnalysisReport {
    pub(crate) test_pattern: String,
    pub(crate) control_pattern: Option<String>,
    pub(crate) basis: DiffBasis,
    pub(crate) alpha: f64,
    pub(crate) periods: PeriodSet,
    pub(crate) yoy_offset_days: i64,
    pub(crate) yoy_note: &'static str,
    pub(crate) total_rows: usize,
    pub(crate) invalid_date_rows: usize,
    pub(crate) control_overlap_rows: usize,
    pub(crate) cohorts: Vec<CohortReport>,
    pub(crate) net_effects: Vec<NetEffect>,
}

impl AnalysisReport {
    pub(crate) fn cohort(&self, kind: CohortKind) -> Option<&CohortReport> {
        self.cohorts.iter().find(|c| c.cohort == kind)
    }
}

/// Run the full comparison over `dataset`. Pure: the dataset is only borrowed.
pub(crate) fn run_analysis(
    dataset: &Dataset,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AppError> {
    let periods = derive_periods(config.test_window);
    tracing::debug!(
        test = %periods.test,
        pre_test = %periods.pre_test,
        year_over_year = %periods.year_over_year,
        "derived periods"
    );

    let split = partition(dataset, &config.test_pattern, config.control_pattern.as_ref());
    tracing::debug!(
        test_rows = split.test.len(),
        control_rows = split.control.len(),
        overlap = split.overlap,
        "partitioned dataset"
    );

    if split.overlap > 0 {
        if config.reject_overlap {
            return Err(AppError::Overlap {
                rows: split.overlap,
            });
        }
        tracing::warn!(
            rows = split.overlap,
            "control pattern also matches test pages; overlapping rows count in both groups"
        );
    }
    if split.test.is_empty() {
        tracing::warn!(
            pattern = config.test_pattern.as_str(),
            "test pattern matched no rows"
        );
    }

    let test = analyze_cohort(&split.test, &periods, config);
    let control = analyze_cohort(&split.control, &periods, config);
    let net_effects = net_effects(&test, &control);

    Ok(AnalysisReport {
        test_pattern: config.test_pattern.as_str().to_string(),
        control_pattern: config
            .control_pattern
            .as_ref()
            .map(|p| p.as_str().to_string()),
        basis: config.basis,
        alpha: config.alpha,
        periods,
        yoy_offset_days: YOY_OFFSET_DAYS,
        yoy_note: YOY_NOTE,
        total_rows: dataset.len(),
        invalid_date_rows: dataset.invalid_dates().count(),
        control_overlap_rows: split.overlap,
        cohorts: vec![test, control],
        net_effects,
    })
}

fn analyze_cohort(cohort: &Cohort<'_>, periods: &PeriodSet, config: &AnalysisConfig) -> CohortReport {
    let windows = [Period::Test, Period::PreTest, Period::YearOverYear];
    let rows: Vec<Vec<&Record>> = windows
        .iter()
        .map(|&p| filter_window(cohort, periods.window(p)))
        .collect();
    let summaries: Vec<MetricSummary> = rows.iter().map(|r| summarize(r)).collect();

    let mut comparisons = Vec::with_capacity(Period::BASELINES.len() * Metric::ALL.len());
    for (i, &baseline) in windows.iter().enumerate().skip(1) {
        for metric in Metric::ALL {
            let d = delta(&summaries[0], &summaries[i], metric, config.basis);
            let significance = if config.significance {
                welch_t_test(
                    &metric_sample(&rows[0], metric),
                    &metric_sample(&rows[i], metric),
                )
            } else {
                Significance::NotComputable(NotComputable::Skipped)
            };
            let p_value = significance.p_value();
            comparisons.push(ComparisonResult {
                cohort: cohort.kind,
                baseline,
                metric,
                current_value: d.current,
                baseline_value: d.baseline,
                absolute_diff: d.absolute,
                relative_diff_percent: d.relative_percent,
                p_value,
                significant: p_value.is_some_and(|p| p < config.alpha),
                significance,
            });
        }
    }

    let periods = windows
        .iter()
        .zip(summaries)
        .map(|(&p, summary)| PeriodSummary::new(p, periods.window(p), summary))
        .collect();

    CohortReport {
        cohort: cohort.kind,
        row_count: cohort.len(),
        periods,
        comparisons,
    }
}

fn net_effects(test: &CohortReport, control: &CohortReport) -> Vec<NetEffect> {
    let mut out = Vec::new();
    for baseline in Period::BASELINES {
        for metric in Metric::ALL {
            let test_rel = test
                .comparison(baseline, metric)
                .and_then(|c| c.relative_diff_percent);
            let control_rel = control
                .comparison(baseline, metric)
                .and_then(|c| c.relative_diff_percent);
            out.push(NetEffect {
                baseline,
                metric,
                test_relative_diff_percent: test_rel,
                control_relative_diff_percent: control_rel,
                net_diff_points: net_effect(test_rel, control_rel),
            });
        }
    }
    out
}
