use serde_json::json;

use crate::consts::{YOY_NOTE, YOY_OFFSET_DAYS};
use crate::core::{AnalysisReport, Dataset, PeriodSet};
use crate::data::LoadResult;
use crate::error::AppError;
use crate::output::format::record_issues;

pub(crate) fn output_report_json(
    report: &AnalysisReport,
    load: &LoadResult,
) -> Result<String, AppError> {
    let output = json!({
        "input": {
            "rows": load.dataset.len(),
            "invalid_dates": load.invalid_dates,
            "null_clicks": load.null_clicks,
            "null_impressions": load.null_impressions,
        },
        "analysis": report,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

pub(crate) fn output_periods_json(periods: &PeriodSet) -> Result<String, AppError> {
    let output = json!({
        "test": periods.test,
        "pre_test": periods.pre_test,
        "year_over_year": periods.year_over_year,
        "yoy_offset_days": YOY_OFFSET_DAYS,
        "yoy_note": YOY_NOTE,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

pub(crate) fn output_invalid_json(dataset: &Dataset) -> Result<String, AppError> {
    let rows: Vec<serde_json::Value> = dataset
        .records()
        .iter()
        .filter_map(|r| {
            let issues = record_issues(r);
            if issues.is_empty() {
                return None;
            }
            Some(json!({
                "line": r.line,
                "date": r.raw_date,
                "landing_page": r.page,
                "clicks": r.clicks,
                "impressions": r.impressions,
                "issues": issues,
            }))
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AnalysisConfig, DateWindow, Record, derive_periods, run_analysis};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn load() -> LoadResult {
        let rows = vec![
            Record {
                line: 2,
                date: Some(d(2023, 9, 1)),
                raw_date: "2023-09-01".to_string(),
                page: "/test-page-1".to_string(),
                clicks: Some(100),
                impressions: Some(1000),
            },
            Record {
                line: 3,
                date: None,
                raw_date: "2023/09/02".to_string(),
                page: "/test-page-2".to_string(),
                clicks: Some(150),
                impressions: None,
            },
        ];
        LoadResult {
            dataset: Dataset::new(rows),
            invalid_dates: 1,
            null_impressions: 1,
            ..Default::default()
        }
    }

    #[test]
    fn report_json_nests_analysis_and_input() {
        let load = load();
        let window = DateWindow::new(d(2023, 9, 1), d(2023, 9, 2)).unwrap();
        let config = AnalysisConfig::new("test-page", None, window).unwrap();
        let report = run_analysis(&load.dataset, &config).unwrap();

        let text = output_report_json(&report, &load).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["input"]["rows"], 2);
        assert_eq!(v["input"]["invalid_dates"], 1);
        assert_eq!(v["analysis"]["test_pattern"], "test-page");
        assert_eq!(v["analysis"]["periods"]["test"]["start"], "2023-09-01");
        assert_eq!(v["analysis"]["cohorts"][0]["cohort"], "test");
        assert_eq!(v["analysis"]["cohorts"][0]["periods"][0]["clicks_total"], 100);
        // Undefined values serialize as null
        let pre = &v["analysis"]["cohorts"][0]["comparisons"][0];
        assert_eq!(pre["baseline"], "pre_test");
        assert!(pre["relative_diff_percent"].is_null());
        assert_eq!(pre["significance"]["status"], "not_computable");
    }

    #[test]
    fn periods_json() {
        let periods = derive_periods(DateWindow::new(d(2024, 3, 1), d(2024, 3, 10)).unwrap());
        let v: serde_json::Value = serde_json::from_str(&output_periods_json(&periods).unwrap()).unwrap();
        assert_eq!(v["pre_test"]["start"], "2024-02-20");
        assert_eq!(v["pre_test"]["end"], "2024-02-29");
        assert_eq!(v["year_over_year"]["start"], "2023-03-02");
        assert_eq!(v["yoy_offset_days"], 365);
    }

    #[test]
    fn invalid_json_lists_problem_rows() {
        let v: serde_json::Value =
            serde_json::from_str(&output_invalid_json(&load().dataset).unwrap()).unwrap();
        let rows = v.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["line"], 3);
        assert_eq!(rows[0]["date"], "2023/09/02");
        assert!(rows[0]["impressions"].is_null());
        assert_eq!(rows[0]["issues"], json!(["invalid_date", "null_impressions"]));
    }
}
