use super::fetch_text;
use crate::data::sample_reports;
use crate::import::csv::parse_reports;
use crate::logging::debug_log;
use crate::models::Report;
use chrono::NaiveDate;

/// Where a loaded report list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSource {
    Remote,
    /// The spreadsheet could not be fetched; built-in samples are shown instead
    Sample,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedReports {
    pub reports: Vec<Report>,
    pub source: ReportSource,
    pub skipped_rows: usize,
}

/// Fetch and decode the published report spreadsheet, falling back to sample data
pub async fn load_reports(url: &str, today: NaiveDate) -> LoadedReports {
    match fetch_text(url).await {
        Ok(text) => {
            let parsed = parse_reports(&text, today);
            debug_log!("Loaded {} reports ({} skipped)", parsed.reports.len(), parsed.skipped.len());
            LoadedReports {
                reports: parsed.reports,
                source: ReportSource::Remote,
                skipped_rows: parsed.skipped.len(),
            }
        }
        Err(e) => {
            leptos::logging::error!("Error loading reports: {e}");
            LoadedReports {
                reports: sample_reports(today),
                source: ReportSource::Sample,
                skipped_rows: 0,
            }
        }
    }
}
