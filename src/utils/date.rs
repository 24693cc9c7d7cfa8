use chrono::NaiveDate;

use crate::consts::DATE_FORMAT;
use crate::error::AppError;

/// Parse a date given on the command line
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    let s = s.trim();
    if s.len() == 8
        && let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d")
    {
        return Ok(d);
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| AppError::InvalidDate {
        input: s.to_string(),
    })
}

/// Parse a date cell from the input file. Only the fixed format is accepted.
pub(crate) fn parse_cell_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parse_date_accepts_both_forms() {
        assert_eq!(parse_date("20240301").unwrap(), d(2024, 3, 1));
        assert_eq!(parse_date("2024-03-01").unwrap(), d(2024, 3, 1));
        assert_eq!(parse_date(" 2024-03-01 ").unwrap(), d(2024, 3, 1));
    }

    #[test]
    fn parse_date_rejects_garbage() {
        let err = parse_date("March 1st").unwrap_err();
        assert!(err.to_string().contains("March 1st"));
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn cell_date_is_strict() {
        assert_eq!(parse_cell_date("2023-09-01"), Some(d(2023, 9, 1)));
        assert_eq!(parse_cell_date("20230901"), None);
        assert_eq!(parse_cell_date("01/09/2023"), None);
        assert_eq!(parse_cell_date(""), None);
    }
}
