//! Date-window filtering over cohort views

use crate::core::types::{Cohort, DateWindow, Record};

/// Rows of `cohort` whose date lies inside `window`.
///
/// Rows with an unparsed date never match. The cohort is only borrowed, so
/// the same cohort can be filtered for every period.
pub(crate) fn filter_window<'a>(cohort: &Cohort<'a>, window: DateWindow) -> Vec<&'a Record> {
    cohort
        .rows
        .iter()
        .copied()
        .filter(|record| record.date.is_some_and(|date| window.contains(date)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CohortKind;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn records() -> Vec<Record> {
        let dates = [
            Some(d(2023, 8, 31)),
            Some(d(2023, 9, 1)),
            None,
            Some(d(2023, 9, 2)),
            Some(d(2023, 9, 3)),
        ];
        dates
            .into_iter()
            .enumerate()
            .map(|(i, date)| Record {
                line: i + 2,
                date,
                raw_date: String::new(),
                page: "/p".to_string(),
                clicks: Some(1),
                impressions: Some(1),
            })
            .collect()
    }

    #[test]
    fn keeps_inclusive_range_and_drops_invalid_dates() {
        let rows = records();
        let cohort = Cohort {
            kind: CohortKind::Test,
            rows: rows.iter().collect(),
        };
        let window = DateWindow::new(d(2023, 9, 1), d(2023, 9, 2)).unwrap();
        let lines: Vec<usize> = filter_window(&cohort, window).iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![3, 5]);
    }

    #[test]
    fn filtering_is_repeatable_and_leaves_cohort_intact() {
        let rows = records();
        let cohort = Cohort {
            kind: CohortKind::Control,
            rows: rows.iter().collect(),
        };
        let window = DateWindow::new(d(2023, 9, 1), d(2023, 9, 3)).unwrap();
        let first = filter_window(&cohort, window);
        let second = filter_window(&cohort, window);
        assert_eq!(first, second);
        assert_eq!(cohort.len(), 5);
    }

    #[test]
    fn window_outside_data_is_empty() {
        let rows = records();
        let cohort = Cohort {
            kind: CohortKind::Test,
            rows: rows.iter().collect(),
        };
        let window = DateWindow::new(d(2022, 9, 1), d(2022, 9, 3)).unwrap();
        assert!(filter_window(&cohort, window).is_empty());
    }
}
