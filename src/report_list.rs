use crate::models::Report;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const CSV_EXPORT_HEADERS: [&str; 8] = [
    "Tipo",
    "Descripción",
    "Reportado por",
    "Fecha",
    "Estado",
    "Latitud",
    "Longitud",
    "Prioridad",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    /// Newest first, undated reports last
    #[default]
    #[serde(rename = "fecha")]
    Date,
    #[serde(rename = "tipo")]
    ProblemType,
    #[serde(rename = "estado")]
    Status,
    /// High priority first
    #[serde(rename = "prioridad")]
    Priority,
}

impl SortKey {
    pub const ALL: [Self; 4] = [Self::Date, Self::ProblemType, Self::Status, Self::Priority];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "fecha",
            Self::ProblemType => "tipo",
            Self::Status => "estado",
            Self::Priority => "prioridad",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == value)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Date => "Fecha",
            Self::ProblemType => "Tipo",
            Self::Status => "Estado",
            Self::Priority => "Prioridad",
        }
    }

    fn compare(self, a: &Report, b: &Report) -> Ordering {
        match self {
            Self::Date => match (a.date, b.date) {
                (Some(a), Some(b)) => b.cmp(&a),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            Self::ProblemType => a.problem_type.to_lowercase().cmp(&b.problem_type.to_lowercase()),
            Self::Status => a.status.to_lowercase().cmp(&b.status.to_lowercase()),
            Self::Priority => a.priority.cmp(&b.priority),
        }
    }
}

/// Type and status match exactly; the search text is a case-insensitive
/// substring of the description, author, type or address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub problem_type: Option<String>,
    pub status: Option<String>,
    pub search: String,
}

impl ReportFilter {
    #[must_use]
    pub fn matches(&self, report: &Report) -> bool {
        if self.problem_type.as_ref().is_some_and(|t| *t != report.problem_type) {
            return false;
        }
        if self.status.as_ref().is_some_and(|s| *s != report.status) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&report.description, &report.author, &report.problem_type, &report.address]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Stable sort by `key`
pub fn sort_reports(reports: &mut [Report], key: SortKey) {
    reports.sort_by(|a, b| key.compare(a, b));
}

/// Filtered and sorted copy of `reports`
#[must_use]
pub fn query_reports(reports: &[Report], filter: &ReportFilter, key: SortKey) -> Vec<Report> {
    let mut matching: Vec<Report> = reports.iter().filter(|r| filter.matches(r)).cloned().collect();
    sort_reports(&mut matching, key);
    matching
}

#[must_use]
pub fn total_pages(count: usize, per_page: usize) -> usize {
    count.div_ceil(per_page.max(1))
}

/// One page of a result list. Page numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a> {
    pub items: &'a [Report],
    pub page: usize,
    pub total_pages: usize,
    /// Index (0-based) of the first item in the full list
    pub offset: usize,
    pub total: usize,
}

impl Page<'_> {
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// `Mostrando a-b de n`
    #[must_use]
    pub fn range_label(&self) -> String {
        if self.items.is_empty() {
            return format!("Mostrando 0 de {}", self.total);
        }
        format!("Mostrando {}-{} de {}", self.offset + 1, self.offset + self.items.len(), self.total)
    }
}

/// Slice out page `page`, clamped to the valid range
#[must_use]
pub fn paginate(reports: &[Report], page: usize, per_page: usize) -> Page<'_> {
    let per_page = per_page.max(1);
    let total_pages = total_pages(reports.len(), per_page);
    let page = page.clamp(1, total_pages.max(1));
    let offset = (page - 1) * per_page;
    let end = (offset + per_page).min(reports.len());
    Page {
        items: reports.get(offset..end).unwrap_or_default(),
        page,
        total_pages,
        offset,
        total: reports.len(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Page(usize),
    Ellipsis,
}

/// Page selector entries: first, last and current ±2, with an ellipsis at ±3
#[must_use]
pub fn page_buttons(current: usize, total_pages: usize) -> Vec<PageButton> {
    if total_pages <= 1 {
        return Vec::new();
    }
    (1..=total_pages)
        .filter_map(|page| {
            if page == 1 || page == total_pages || page.abs_diff(current) <= 2 {
                Some(PageButton::Page(page))
            } else if page.abs_diff(current) == 3 {
                Some(PageButton::Ellipsis)
            } else {
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportStats {
    pub total: usize,
    /// Count per configured status, in configuration order
    pub by_status: IndexMap<String, usize>,
}

impl ReportStats {
    #[must_use]
    pub fn count(&self, status: &str) -> usize {
        self.by_status.get(status).copied().unwrap_or(0)
    }
}

#[must_use]
pub fn report_stats<'a>(reports: &[Report], statuses: impl IntoIterator<Item = &'a str>) -> ReportStats {
    let mut by_status: IndexMap<String, usize> = statuses.into_iter().map(|s| (s.to_string(), 0)).collect();
    for report in reports {
        if let Some(count) = by_status.get_mut(&report.status) {
            *count += 1;
        }
    }
    ReportStats {
        total: reports.len(),
        by_status,
    }
}

/// CSV document of `reports` for download
///
/// # Errors
///
/// Returns an error if the CSV writer fails
pub fn export_reports_csv(reports: &[Report]) -> Result<String, String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_EXPORT_HEADERS)
        .map_err(|e| format!("Failed to write CSV header: {e}"))?;

    for report in reports {
        let lat = report.location.lat.to_string();
        let lng = report.location.lng.to_string();
        writer
            .write_record([
                report.problem_type.as_str(),
                report.description.as_str(),
                report.author.as_str(),
                report.raw_date.as_str(),
                report.status.as_str(),
                lat.as_str(),
                lng.as_str(),
                report.priority.as_str(),
            ])
            .map_err(|e| format!("Failed to write CSV row: {e}"))?;
    }

    let bytes = writer.into_inner().map_err(|e| format!("Failed to flush CSV: {e}"))?;
    String::from_utf8(bytes).map_err(|e| format!("CSV is not UTF-8: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LatLng, Priority};
    use chrono::NaiveDate;

    fn report(author: &str, problem_type: &str, status: &str, day: Option<u32>, priority: Priority) -> Report {
        Report {
            author: author.to_string(),
            problem_type: problem_type.to_string(),
            description: format!("Problema reportado por {author}"),
            address: "Zona 1".to_string(),
            location: LatLng { lat: 14.6, lng: -90.5 },
            date: day.and_then(|d| NaiveDate::from_ymd_opt(2024, 3, d)),
            raw_date: day.map(|d| format!("3/{d}/2024")).unwrap_or_default(),
            status: status.to_string(),
            days_since: 0,
            priority,
        }
    }

    fn reports() -> Vec<Report> {
        vec![
            report("Ana", "Bache", "Pendiente", Some(1), Priority::Medium),
            report("Luis", "Fuga de agua", "Resuelto", Some(5), Priority::High),
            report("Eva", "Basura", "Pendiente", None, Priority::Low),
            report("Sol", "Bache", "En proceso", Some(3), Priority::High),
        ]
    }

    fn authors(reports: &[Report]) -> Vec<&str> {
        reports.iter().map(|r| r.author.as_str()).collect()
    }

    #[test]
    fn test_sort_by_date_newest_first_undated_last() {
        let sorted = query_reports(&reports(), &ReportFilter::default(), SortKey::Date);
        assert_eq!(authors(&sorted), vec!["Luis", "Sol", "Ana", "Eva"]);
    }

    #[test]
    fn test_sort_by_priority_is_stable() {
        let sorted = query_reports(&reports(), &ReportFilter::default(), SortKey::Priority);
        assert_eq!(authors(&sorted), vec!["Luis", "Sol", "Ana", "Eva"]);
    }

    #[test]
    fn test_sort_by_type() {
        let sorted = query_reports(&reports(), &ReportFilter::default(), SortKey::ProblemType);
        assert_eq!(authors(&sorted), vec!["Ana", "Sol", "Eva", "Luis"]);
    }

    #[test]
    fn test_filter_by_type_and_status() {
        let filter = ReportFilter {
            problem_type: Some("Bache".to_string()),
            status: Some("Pendiente".to_string()),
            search: String::new(),
        };
        let filtered = query_reports(&reports(), &filter, SortKey::Date);
        assert_eq!(authors(&filtered), vec!["Ana"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let filter = ReportFilter {
            search: "  FUGA ".to_string(),
            ..ReportFilter::default()
        };
        assert_eq!(authors(&query_reports(&reports(), &filter, SortKey::Date)), vec!["Luis"]);

        let filter = ReportFilter {
            search: "eva".to_string(),
            ..ReportFilter::default()
        };
        assert_eq!(authors(&query_reports(&reports(), &filter, SortKey::Date)), vec!["Eva"]);
    }

    #[test]
    fn test_sort_key_tokens() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(serde_json::to_string(&SortKey::Priority).expect("serializes"), "\"prioridad\"");
    }

    #[test]
    fn test_paginate() {
        let many: Vec<Report> = (0..23)
            .map(|i| report(&format!("R{i}"), "Bache", "Pendiente", None, Priority::Low))
            .collect();
        let page = paginate(&many, 3, 10);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_previous());
        assert!(!page.has_next());
        assert_eq!(page.range_label(), "Mostrando 21-23 de 23");

        let clamped = paginate(&many, 9, 10);
        assert_eq!(clamped.page, 3);

        let empty = paginate(&[], 1, 10);
        assert!(empty.items.is_empty());
        assert_eq!(empty.total_pages, 0);
        assert_eq!(empty.range_label(), "Mostrando 0 de 0");
    }

    #[test]
    fn test_page_buttons_window() {
        use PageButton::{Ellipsis, Page};
        assert!(page_buttons(1, 1).is_empty());
        assert_eq!(page_buttons(1, 3), vec![Page(1), Page(2), Page(3)]);
        assert_eq!(
            page_buttons(6, 12),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Page(7), Page(8), Ellipsis, Page(12)]
        );
        assert_eq!(page_buttons(1, 10), vec![Page(1), Page(2), Page(3), Ellipsis, Page(10)]);
    }

    #[test]
    fn test_report_stats() {
        let stats = report_stats(&reports(), ["Pendiente", "En proceso", "Resuelto", "Cancelado"]);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.count("Pendiente"), 2);
        assert_eq!(stats.count("Resuelto"), 1);
        assert_eq!(stats.count("Cancelado"), 0);
        assert_eq!(stats.count("Desconocido"), 0);
    }

    #[test]
    fn test_export_csv() {
        let mut first = report("Ana", "Bache", "Pendiente", Some(1), Priority::Medium);
        first.description = "Hoyo grande, \"peligroso\"".to_string();
        let csv = export_reports_csv(&[first]).expect("export succeeds");
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Tipo,Descripción,Reportado por,Fecha,Estado,Latitud,Longitud,Prioridad")
        );
        assert_eq!(
            lines.next(),
            Some("Bache,\"Hoyo grande, \"\"peligroso\"\"\",Ana,3/1/2024,Pendiente,14.6,-90.5,medium")
        );
    }
}
