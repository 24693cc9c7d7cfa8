//! Comparison windows derived from a single test window

use chrono::Duration;

use crate::consts::YOY_OFFSET_DAYS;
use crate::core::types::{DateWindow, PeriodSet};

/// Derive the pre-test and year-over-year windows.
///
/// `pre_test` ends the day before the test window and spans the same plain
/// day delta. `year_over_year` is the test window shifted back a fixed 365
/// days, so a window after a leap day lands one calendar day off.
pub(crate) fn derive_periods(test: DateWindow) -> PeriodSet {
    let length = Duration::days(test.length_days());
    let pre_end = test.start - Duration::days(1);
    let pre_test = DateWindow {
        start: pre_end - length,
        end: pre_end,
    };

    PeriodSet {
        test,
        pre_test,
        year_over_year: test.shifted_back(YOY_OFFSET_DAYS),
    }
}
