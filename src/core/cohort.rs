//! Test/control partitioning by page pattern

use regex::{Regex, RegexBuilder};

use crate::core::types::{Cohort, CohortKind, Dataset, Record};
use crate::error::AppError;

/// Case-insensitive regex matched anywhere in the page identifier
#[derive(Debug, Clone)]
pub(crate) struct PagePattern {
    source: String,
    regex: Regex,
}

impl PagePattern {
    pub(crate) fn new(pattern: &str) -> Result<Self, AppError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| AppError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Optional pattern; blank input means "not given"
    pub(crate) fn optional(pattern: Option<&str>) -> Result<Option<Self>, AppError> {
        match pattern.map(str::trim) {
            None | Some("") => Ok(None),
            Some(p) => Self::new(p).map(Some),
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.source
    }

    pub(crate) fn matches(&self, page: &str) -> bool {
        self.regex.is_match(page)
    }
}

/// Result of splitting a dataset into the two cohorts
#[derive(Debug)]
pub(crate) struct Partition<'a> {
    pub(crate) test: Cohort<'a>,
    pub(crate) control: Cohort<'a>,
    /// Rows present in both cohorts (only possible with a control pattern)
    pub(crate) overlap: usize,
}

/// Split `dataset` into test and control cohorts.
///
/// Without a control pattern the control cohort is every row the test
/// pattern did not match. With one, both patterns are applied independently
/// and a row may land in both cohorts.
pub(crate) fn partition<'a>(
    dataset: &'a Dataset,
    test: &PagePattern,
    control: Option<&PagePattern>,
) -> Partition<'a> {
    let mut test_rows: Vec<&Record> = Vec::new();
    let mut control_rows: Vec<&Record> = Vec::new();
    let mut overlap = 0;

    for record in dataset.records() {
        let in_test = test.matches(&record.page);
        let in_control = match control {
            Some(pattern) => pattern.matches(&record.page),
            None => !in_test,
        };
        if in_test {
            test_rows.push(record);
        }
        if in_control {
            control_rows.push(record);
        }
        if in_test && in_control {
            overlap += 1;
        }
    }

    Partition {
        test: Cohort {
            kind: CohortKind::Test,
            rows: test_rows,
        },
        control: Cohort {
            kind: CohortKind::Control,
            rows: control_rows,
        },
        overlap,
    }
}
