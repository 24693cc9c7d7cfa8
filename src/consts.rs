/// Date format of the `Date` column and of every date we print: "2025-01-15"
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Column headers of a Search Console landing-page export
pub(crate) const DATE_COLUMN: &str = "Date";
pub(crate) const PAGE_COLUMN: &str = "Landing Page";
pub(crate) const CLICKS_COLUMN: &str = "Url Clicks";
pub(crate) const IMPRESSIONS_COLUMN: &str = "Impressions";

/// Fixed year-over-year shift. Leap days are not corrected.
pub(crate) const YOY_OFFSET_DAYS: i64 = 365;

pub(crate) const YOY_NOTE: &str =
    "Year-over-year window is the test window shifted back exactly 365 days (no leap-day correction)";

pub(crate) const DEFAULT_ALPHA: f64 = 0.05;
