use crate::import::csv::parse_reports;
use crate::models::Report;
use chrono::NaiveDate;

/// Reports shown when the published spreadsheet cannot be reached
#[must_use]
pub fn sample_reports(today: NaiveDate) -> Vec<Report> {
    let csv_content = include_str!("../test-data/sample_reports.csv");
    parse_reports(csv_content, today).reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    #[test]
    fn test_sample_reports_all_decode() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 10).expect("valid date");
        let reports = sample_reports(today);
        assert_eq!(reports.len(), 8);
        assert_eq!(reports[2].author, "Anónimo");
        assert!(reports[2].description.contains("\"totalmente\""));
        assert!(reports.iter().any(|r| r.priority == Priority::High));
    }
}
