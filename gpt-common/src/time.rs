//! Date utilities

use chrono::{Datelike, Local, NaiveDate};

/// Display format for dates in summary tables
pub const DISPLAY_DATE_FORMAT: &str = "%m/%d/%Y";

/// Current local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format an optional date for a summary table (`MM/DD/YYYY`, blank when unset)
pub fn display_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
}

/// Monday that starts the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Parse a form date (`YYYY-MM-DD`)
pub fn parse_form_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Three-letter weekday labels in heatmap row order
pub const WEEKDAY_ABBR: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date(Some(d(2024, 2, 5))).as_deref(), Some("02/05/2024"));
        assert_eq!(display_date(None), None);
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2024-01-07 is a Sunday
        assert_eq!(week_start(d(2024, 1, 7)), d(2024, 1, 1));
        assert_eq!(week_start(d(2024, 1, 1)), d(2024, 1, 1));
        // Crosses a year boundary
        assert_eq!(week_start(d(2025, 1, 1)), d(2024, 12, 30));
    }

    #[test]
    fn test_parse_form_date() {
        assert_eq!(parse_form_date("2024-03-01"), Some(d(2024, 3, 1)));
        assert_eq!(parse_form_date(""), None);
        assert_eq!(parse_form_date("03/01/2024"), None);
    }
}
