use csv::Writer;

use crate::core::{AnalysisReport, Dataset, Significance};
use crate::error::AppError;
use crate::output::format::record_issues;

fn opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

fn into_string(writer: Writer<Vec<u8>>) -> Result<String, AppError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Csv(csv::Error::from(e.into_error())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// One row per (cohort, baseline, metric); undefined values are empty cells
pub(crate) fn output_report_csv(report: &AnalysisReport) -> Result<String, AppError> {
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record([
        "cohort",
        "baseline",
        "metric",
        "current_value",
        "baseline_value",
        "absolute_diff",
        "relative_diff_percent",
        "t_statistic",
        "degrees_of_freedom",
        "p_value",
        "significant",
        "note",
    ])?;

    for cohort in &report.cohorts {
        for c in &cohort.comparisons {
            let (t, df, note) = match c.significance {
                Significance::Computed {
                    t_statistic,
                    degrees_of_freedom,
                    ..
                } => (Some(t_statistic), Some(degrees_of_freedom), String::new()),
                Significance::NotComputable(reason) => (None, None, reason.describe()),
            };
            wtr.write_record([
                c.cohort.key().to_string(),
                c.baseline.key().to_string(),
                c.metric.key().to_string(),
                opt(c.current_value),
                opt(c.baseline_value),
                opt(c.absolute_diff),
                opt(c.relative_diff_percent),
                opt(t),
                opt(df),
                opt(c.p_value),
                c.significant.to_string(),
                note,
            ])?;
        }
    }
    into_string(wtr)
}

pub(crate) fn output_invalid_csv(dataset: &Dataset) -> Result<String, AppError> {
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(["line", "date", "landing_page", "clicks", "impressions", "issues"])?;
    for r in dataset.records() {
        let issues = record_issues(r);
        if issues.is_empty() {
            continue;
        }
        wtr.write_record([
            r.line.to_string(),
            r.raw_date.clone(),
            r.page.clone(),
            r.clicks.map(|n| n.to_string()).unwrap_or_default(),
            r.impressions.map(|n| n.to_string()).unwrap_or_default(),
            issues.join(";"),
        ])?;
    }
    into_string(wtr)
}
