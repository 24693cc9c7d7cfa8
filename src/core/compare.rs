//! Absolute and relative differences between periods

use crate::core::types::{DiffBasis, Metric, MetricSummary};

/// Difference of one metric between a current and a baseline period
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Delta {
    pub(crate) current: Option<f64>,
    pub(crate) baseline: Option<f64>,
    pub(crate) absolute: Option<f64>,
    pub(crate) relative_percent: Option<f64>,
}

/// `(current - baseline) / baseline * 100`; `None` for a zero baseline
pub(crate) fn relative_diff_percent(absolute: f64, baseline: f64) -> Option<f64> {
    if baseline == 0.0 {
        return None;
    }
    let pct = absolute / baseline * 100.0;
    pct.is_finite().then_some(pct)
}

pub(crate) fn delta(
    current: &MetricSummary,
    baseline: &MetricSummary,
    metric: Metric,
    basis: DiffBasis,
) -> Delta {
    let current = basis.value(current, metric);
    let baseline = basis.value(baseline, metric);
    let absolute = current.zip(baseline).map(|(c, b)| c - b);
    let relative_percent = absolute
        .zip(baseline)
        .and_then(|(abs, b)| relative_diff_percent(abs, b));

    Delta {
        current,
        baseline,
        absolute,
        relative_percent,
    }
}

/// Test-group change minus control-group change, in percentage points
pub(crate) fn net_effect(test: Option<f64>, control: Option<f64>) -> Option<f64> {
    test.zip(control).map(|(t, c)| t - c)
}
