//! Metric aggregation for filtered rows

use std::collections::HashSet;

use crate::core::types::{Metric, MetricSummary, Record};

/// Sum metrics over `rows`. Null metric cells contribute 0; totals saturate at `u64::MAX`.
pub(crate) fn summarize(rows: &[&Record]) -> MetricSummary {
    let mut summary = MetricSummary {
        row_count: rows.len(),
        ..Default::default()
    };
    let mut days = HashSet::new();
    let mut pages = HashSet::new();

    for record in rows {
        summary.clicks_total = summary
            .clicks_total
            .saturating_add(record.clicks.unwrap_or(0));
        summary.impressions_total = summary
            .impressions_total
            .saturating_add(record.impressions.unwrap_or(0));
        if let Some(date) = record.date {
            days.insert(date);
        }
        pages.insert(record.page.as_str());
    }

    summary.day_count = days.len();
    summary.unique_page_count = pages.len();
    summary
}

/// Per-row values of `metric` for significance testing. Null cells are not
/// observations and are left out.
pub(crate) fn metric_sample(rows: &[&Record], metric: Metric) -> Vec<f64> {
    rows.iter()
        .filter_map(|record| record.metric(metric))
        .map(|v| v as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, page: &str, clicks: Option<u64>, impressions: Option<u64>) -> Record {
        Record {
            line: 0,
            date: NaiveDate::from_ymd_opt(2023, 9, day),
            raw_date: String::new(),
            page: page.to_string(),
            clicks,
            impressions,
        }
    }

    #[test]
    fn sums_totals_days_and_pages() {
        let rows = [
            record(1, "/test-page-1", Some(100), Some(1000)),
            record(2, "/test-page-2", Some(150), Some(1200)),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let s = summarize(&refs);
        assert_eq!(s.clicks_total, 250);
        assert_eq!(s.impressions_total, 2200);
        assert_eq!(s.day_count, 2);
        assert_eq!(s.unique_page_count, 2);
        assert_eq!(s.row_count, 2);
    }

    #[test]
    fn duplicate_days_and_pages_counted_once() {
        let rows = [
            record(1, "/a", Some(1), Some(10)),
            record(1, "/b", Some(2), Some(20)),
            record(2, "/a", Some(3), Some(30)),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let s = summarize(&refs);
        assert_eq!(s.day_count, 2);
        assert_eq!(s.unique_page_count, 2);
        assert_eq!(s.clicks_total, 6);
    }

    #[test]
    fn null_metrics_count_as_zero() {
        let rows = [
            record(1, "/a", None, Some(10)),
            record(2, "/a", Some(5), None),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let s = summarize(&refs);
        assert_eq!(s.clicks_total, 5);
        assert_eq!(s.impressions_total, 10);
        assert_eq!(s.row_count, 2);
    }

    #[test]
    fn totals_saturate_instead_of_overflowing() {
        let rows = [
            record(1, "/a", Some(u64::MAX), Some(1)),
            record(2, "/a", Some(1), Some(u64::MAX)),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let s = summarize(&refs);
        assert_eq!(s.clicks_total, u64::MAX);
        assert_eq!(s.impressions_total, u64::MAX);
    }

    #[test]
    fn empty_rows_have_no_daily_average() {
        let s = summarize(&[]);
        assert_eq!(s, MetricSummary::default());
        assert_eq!(s.per_day(Metric::Clicks), None);
        assert_eq!(s.per_day(Metric::Impressions), None);
    }

    #[test]
    fn sample_skips_null_cells() {
        let rows = [
            record(1, "/a", Some(4), Some(10)),
            record(2, "/a", None, Some(20)),
            record(3, "/a", Some(6), None),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        assert_eq!(metric_sample(&refs, Metric::Clicks), vec![4.0, 6.0]);
        assert_eq!(metric_sample(&refs, Metric::Impressions), vec![10.0, 20.0]);
    }
}
