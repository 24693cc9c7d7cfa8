use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Missing required column \"{column}\" in input file")]
    Schema { column: String },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: String, end: String },

    #[error("Invalid pattern \"{pattern}\": {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Test pattern must not be empty")]
    EmptyPattern,

    #[error("Control pattern overlaps the test group on {rows} rows")]
    Overlap { rows: usize },

    #[error("Invalid date \"{input}\" (expected YYYYMMDD or YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("Significance level must be between 0 and 1, got {value}")]
    InvalidAlpha { value: f64 },

    #[error("Unsupported locale: {input}")]
    UnsupportedLocale { input: String },

    #[error("Missing required argument: {name}")]
    MissingArgument { name: &'static str },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_names_column() {
        let e = AppError::Schema {
            column: "Date".to_string(),
        };
        assert_eq!(e.to_string(), r#"Missing required column "Date" in input file"#);
    }

    #[test]
    fn invalid_range_display() {
        let e = AppError::InvalidRange {
            start: "2024-03-10".to_string(),
            end: "2024-03-01".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Invalid date range: start 2024-03-10 is after end 2024-03-01"
        );
    }

    #[test]
    fn pattern_error_surfaces_pattern() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let e = AppError::Pattern {
            pattern: "(unclosed".to_string(),
            source,
        };
        assert!(e.to_string().starts_with(r#"Invalid pattern "(unclosed": "#));
    }

    #[test]
    fn invalid_date_display() {
        let e = AppError::InvalidDate {
            input: "abc".to_string(),
        };
        assert_eq!(
            e.to_string(),
            r#"Invalid date "abc" (expected YYYYMMDD or YYYY-MM-DD)"#
        );
    }

    #[test]
    fn overlap_display() {
        assert_eq!(
            AppError::Overlap { rows: 3 }.to_string(),
            "Control pattern overlaps the test group on 3 rows"
        );
    }
}
