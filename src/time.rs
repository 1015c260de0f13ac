use chrono::{Datelike, NaiveDate};

/// Date formats produced by the published spreadsheets, most common first
const REPORT_DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%m/%d/%y"];

/// `%Y` also accepts one- and two-digit years; those belong to `%y`
const MIN_FOUR_DIGIT_YEAR: i32 = 100;

/// Parse the date part of a spreadsheet date or timestamp cell.
///
/// Google Sheets exports form timestamps as `M/D/YYYY H:MM:SS`; only the date
/// part is kept. Returns `None` for empty or unrecognised values.
#[must_use]
pub fn parse_report_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split_whitespace().next()?;
    REPORT_DATE_FORMATS
        .iter()
        .find_map(|format| {
            NaiveDate::parse_from_str(date_part, format)
                .ok()
                .filter(|date| format.contains("%y") || date.year() >= MIN_FOUR_DIGIT_YEAR)
        })
}

/// Whole days between a report date and `today`, 0 when the date is unknown
#[must_use]
pub fn days_since(date: Option<NaiveDate>, today: NaiveDate) -> i64 {
    date.map_or(0, |d| today.signed_duration_since(d).num_days().abs())
}

/// Format a report date the way the Guatemalan locale prints it (`d/m/yyyy`)
#[must_use]
pub fn format_report_date(date: Option<NaiveDate>, raw: &str) -> String {
    match date {
        Some(d) => d.format("%-d/%-m/%Y").to_string(),
        None if raw.trim().is_empty() => "No disponible".to_string(),
        None => raw.to_string(),
    }
}

/// The current local date
#[must_use]
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_parse_report_date_us_format() {
        assert_eq!(parse_report_date("3/15/2025"), Some(date(2025, 3, 15)));
    }

    #[test]
    fn test_parse_report_date_timestamp() {
        assert_eq!(parse_report_date("10/2/2025 14:03:11"), Some(date(2025, 10, 2)));
    }

    #[test]
    fn test_parse_report_date_iso() {
        assert_eq!(parse_report_date("2025-01-31"), Some(date(2025, 1, 31)));
    }

    #[test]
    fn test_parse_report_date_two_digit_year() {
        assert_eq!(parse_report_date("3/1/24"), Some(date(2024, 3, 1)));
        assert_eq!(parse_report_date("12/31/99 8:00:00"), Some(date(1999, 12, 31)));
        assert_eq!(days_since(parse_report_date("3/1/24"), date(2024, 3, 11)), 10);
    }

    #[test]
    fn test_parse_report_date_invalid() {
        assert_eq!(parse_report_date(""), None);
        assert_eq!(parse_report_date("ayer"), None);
        assert_eq!(parse_report_date("13/40/2025"), None);
    }

    #[test]
    fn test_days_since() {
        let today = date(2025, 3, 20);
        assert_eq!(days_since(Some(date(2025, 3, 15)), today), 5);
        assert_eq!(days_since(Some(today), today), 0);
        assert_eq!(days_since(None, today), 0);
    }

    #[test]
    fn test_days_since_future_date_is_absolute() {
        let today = date(2025, 3, 20);
        assert_eq!(days_since(Some(date(2025, 3, 22)), today), 2);
    }

    #[test]
    fn test_format_report_date() {
        assert_eq!(format_report_date(Some(date(2025, 3, 5)), "3/5/2025"), "5/3/2025");
        assert_eq!(format_report_date(None, ""), "No disponible");
        assert_eq!(format_report_date(None, "pronto"), "pronto");
    }
}
